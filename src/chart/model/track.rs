//! Track identity: instruments, difficulties and the drum kit layout.

/// A playable instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instrument {
    /// Lead guitar.
    Guitar,
    /// Co-op guitar.
    GuitarCoop,
    /// Rhythm guitar.
    Rhythm,
    /// Bass guitar.
    Bass,
    /// Drums. The kit layout is inferred separately as [`DrumType`].
    Drums,
    /// Keys.
    Keys,
    /// 6-fret (Guitar Hero Live) lead guitar.
    GuitarGhl,
    /// 6-fret co-op guitar.
    GuitarCoopGhl,
    /// 6-fret rhythm guitar.
    RhythmGhl,
    /// 6-fret bass.
    BassGhl,
}

impl Instrument {
    /// Every playable instrument, in canonical order.
    pub const ALL: [Self; 10] = [
        Self::Guitar,
        Self::GuitarCoop,
        Self::Rhythm,
        Self::Bass,
        Self::Drums,
        Self::Keys,
        Self::GuitarGhl,
        Self::GuitarCoopGhl,
        Self::RhythmGhl,
        Self::BassGhl,
    ];

    /// The note-schema grouping this instrument belongs to.
    #[must_use]
    pub const fn instrument_type(self) -> InstrumentType {
        match self {
            Self::Drums => InstrumentType::Drums,
            Self::GuitarGhl | Self::GuitarCoopGhl | Self::RhythmGhl | Self::BassGhl => {
                InstrumentType::SixFret
            }
            _ => InstrumentType::FiveFret,
        }
    }

    /// The lowercase identifier used in issue descriptions and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guitar => "guitar",
            Self::GuitarCoop => "guitarcoop",
            Self::Rhythm => "rhythm",
            Self::Bass => "bass",
            Self::Drums => "drums",
            Self::Keys => "keys",
            Self::GuitarGhl => "guitarghl",
            Self::GuitarCoopGhl => "guitarcoopghl",
            Self::RhythmGhl => "rhythmghl",
            Self::BassGhl => "bassghl",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived grouping of instruments that share one note schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentType {
    /// Five colored frets plus open.
    FiveFret,
    /// Three white and three black frets plus open (Guitar Hero Live).
    SixFret,
    /// Drum pads and kick.
    Drums,
}

/// A chart difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    /// Expert, the only difficulty most customs chart fully.
    Expert,
    /// Hard.
    Hard,
    /// Medium.
    Medium,
    /// Easy.
    Easy,
}

impl Difficulty {
    /// Every difficulty, hardest first.
    pub const ALL: [Self; 4] = [Self::Expert, Self::Hard, Self::Medium, Self::Easy];

    /// The lowercase identifier used in issue descriptions and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expert => "expert",
            Self::Hard => "hard",
            Self::Medium => "medium",
            Self::Easy => "easy",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The drum kit layout of a chart, inferred once per chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrumType {
    /// Four pads, no tom/cymbal distinction.
    FourLane = 0,
    /// Four pads with tom/cymbal markers (pro drums).
    FourLanePro = 1,
    /// Five pads (Guitar Hero World Tour style).
    FiveLane = 2,
}
