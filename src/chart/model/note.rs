//! Normalized note events and their frozen wire enums.

use super::track::InstrumentType;

/// The canonical note color of a normalized note.
///
/// The numeric values are part of the BTRACK wire format used for hashing
/// and MUST NOT change: a renumbering would invalidate every existing track
/// hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum NoteType {
    /// Open strum (no fret held).
    Open = 1,
    /// Green fret.
    Green = 2,
    /// Red fret.
    Red = 3,
    /// Yellow fret.
    Yellow = 4,
    /// Blue fret.
    Blue = 5,
    /// Orange fret.
    Orange = 6,
    /// 6-fret black 1.
    Black1 = 7,
    /// 6-fret black 2.
    Black2 = 8,
    /// 6-fret black 3.
    Black3 = 9,
    /// 6-fret white 1.
    White1 = 10,
    /// 6-fret white 2.
    White2 = 11,
    /// 6-fret white 3.
    White3 = 12,
    /// Kick drum.
    Kick = 13,
    /// Red drum pad.
    RedDrum = 14,
    /// Yellow drum pad.
    YellowDrum = 15,
    /// Blue drum pad.
    BlueDrum = 16,
    /// Green drum pad.
    GreenDrum = 17,
}

impl NoteType {
    /// The frozen wire value of this note color.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Whether this color belongs to the given instrument family.
    #[must_use]
    pub const fn belongs_to(self, instrument_type: InstrumentType) -> bool {
        match instrument_type {
            InstrumentType::FiveFret => matches!(
                self,
                Self::Open | Self::Green | Self::Red | Self::Yellow | Self::Blue | Self::Orange
            ),
            InstrumentType::SixFret => matches!(
                self,
                Self::Open
                    | Self::Black1
                    | Self::Black2
                    | Self::Black3
                    | Self::White1
                    | Self::White2
                    | Self::White3
            ),
            InstrumentType::Drums => matches!(
                self,
                Self::Kick | Self::RedDrum | Self::YellowDrum | Self::BlueDrum | Self::GreenDrum
            ),
        }
    }
}

bitflags::bitflags! {
    /// Modifier flags of a normalized note.
    ///
    /// The bit values are part of the BTRACK wire format used for hashing
    /// and MUST NOT change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NoteFlags: u32 {
        /// The note requires an explicit strum.
        const STRUM = 1;
        /// Hammer-on / pull-off.
        const HOPO = 2;
        /// Tap note.
        const TAP = 4;
        /// 2x kick pedal note.
        const DOUBLE_KICK = 8;
        /// The pad is a tom.
        const TOM = 16;
        /// The pad is a cymbal.
        const CYMBAL = 32;
        /// Inside a disco section charted `dnoflip`.
        const DISCO_NOFLIP = 64;
        /// Inside a disco-flip section.
        const DISCO = 128;
        /// Flam.
        const FLAM = 256;
        /// Ghost (quiet) hit.
        const GHOST = 512;
        /// Accented (loud) hit.
        const ACCENT = 1024;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NoteFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NoteFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}

/// A single normalized, fully timed note.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// Position in ticks.
    pub tick: i64,
    /// Position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
    /// Sustain length in ticks; 0 means no sustain.
    pub length: i64,
    /// Sustain length in milliseconds, rounded to 3 decimal places.
    pub ms_length: f64,
    /// The canonical note color.
    pub note_type: NoteType,
    /// Modifier flags.
    pub flags: NoteFlags,
}
