//! The intermediate "raw chart" model both format parsers lower into.
//!
//! Raw events carry no millisecond times and no resolved modifiers: they are
//! the on-disk facts — notes, phrase regions, modifier markers — reordered
//! by tick but not yet interpreted. The normalizer consumes this model and
//! produces the final [`super::ParsedChart`].

use super::track::{Difficulty, Instrument, InstrumentType};

/// A chart lowered to the shared intermediate model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawChart {
    /// Ticks per beat. Validated positive by the parsers.
    pub resolution: i64,
    /// `[Song]` metadata key/value pairs in file order. Empty for `.mid`.
    pub metadata: Vec<(String, String)>,
    /// Tempo markers as charted; tick 0 is synthesized later if absent.
    pub tempos: Vec<RawTempo>,
    /// Time signature markers as charted; tick 0 is synthesized later if
    /// absent.
    pub time_signatures: Vec<RawTimeSignature>,
    /// Named sections in chart order.
    pub sections: Vec<RawSection>,
    /// Ticks of every `end` event, in chart order.
    pub end_events: Vec<i64>,
    /// The tick of the first `coda` event, if any. Freestyle phrases at or
    /// after it belong to the big-rock ending.
    pub coda_tick: Option<i64>,
    /// Whether the chart carries vocals.
    pub has_vocals: bool,
    /// One raw track per charted instrument/difficulty section.
    pub tracks: Vec<RawTrack>,
}

/// A raw tempo marker.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTempo {
    /// Position in ticks.
    pub tick: i64,
    /// Beats per minute. Never zero on parser output.
    pub bpm: f64,
}

/// A raw time signature marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTimeSignature {
    /// Position in ticks.
    pub tick: i64,
    /// Beats per measure. Never zero on parser output.
    pub numerator: u32,
    /// The note value of one beat, a power of two.
    pub denominator: u32,
}

/// A raw named section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSection {
    /// Position in ticks.
    pub tick: i64,
    /// The section name as charted.
    pub name: String,
}

/// One instrument/difficulty track of raw events.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTrack {
    /// The instrument this track is charted for.
    pub instrument: Instrument,
    /// The difficulty this track is charted for.
    pub difficulty: Difficulty,
    /// Whether `ENABLE_CHART_DYNAMICS` was seen (`.mid` only): note-on
    /// velocities 127 and 1 then mean accent and ghost on drum notes.
    pub dynamics: bool,
    /// Events ordered by tick (stable with respect to chart order).
    pub events: Vec<RawEvent>,
}

/// A single raw track event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawEvent {
    /// Position in ticks.
    pub tick: i64,
    /// Length in ticks; 0 for instant events.
    pub length: i64,
    /// What the event is.
    pub kind: RawEventKind,
    /// Note-on velocity (`.mid` only, 0 otherwise).
    pub velocity: u8,
    /// MIDI channel (`.mid` only, 0 otherwise).
    pub channel: u8,
}

impl RawEvent {
    /// An event with no velocity/channel payload, as the `.chart` parser
    /// produces.
    #[must_use]
    pub const fn new(tick: i64, length: i64, kind: RawEventKind) -> Self {
        Self {
            tick,
            length,
            kind,
            velocity: 0,
            channel: 0,
        }
    }
}

/// Every kind of event a raw track can hold.
///
/// The disco variants are declared in ascending precedence order because
/// the normalizer's disco register takes the enum-wise minimum of the
/// variants present at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawEventKind {
    // Five-fret notes.
    /// Open strum.
    Open,
    /// Green fret note.
    Green,
    /// Red fret note.
    Red,
    /// Yellow fret note.
    Yellow,
    /// Blue fret note.
    Blue,
    /// Orange fret note.
    Orange,

    // Six-fret notes.
    /// White 1 note.
    White1,
    /// White 2 note.
    White2,
    /// White 3 note.
    White3,
    /// Black 1 note.
    Black1,
    /// Black 2 note.
    Black2,
    /// Black 3 note.
    Black3,

    // Drum notes.
    /// Kick note.
    Kick,
    /// 2x kick pedal note.
    DoubleKick,
    /// Red pad note.
    RedDrum,
    /// Yellow pad note.
    YellowDrum,
    /// Blue pad note.
    BlueDrum,
    /// The pad charted as lane 4: green on a four-lane kit, orange on a
    /// five-lane kit.
    FourLaneGreen,
    /// The pad charted as lane 5: green on a five-lane kit.
    FiveLaneGreen,

    // Disco-flip register states.
    /// End of a disco section.
    DiscoFlipOff,
    /// Start of a disco-flip section.
    DiscoFlipOn,
    /// Start of a disco section charted `dnoflip`.
    DiscoNoFlipOn,

    // Fret modifiers.
    /// The `.chart` force marker: toggles the natural HOPO state.
    ForceUnnatural,
    /// Forces the group to a single open note.
    ForceOpen,
    /// Forces tap.
    ForceTap,
    /// Forces strum.
    ForceStrum,
    /// Forces HOPO.
    ForceHopo,

    // Drum modifiers.
    /// Flam marker.
    ForceFlam,
    /// Yellow tom marker (`.mid` pro drums).
    YellowTomMarker,
    /// Blue tom marker (`.mid` pro drums).
    BlueTomMarker,
    /// Green tom marker (`.mid` pro drums).
    GreenTomMarker,
    /// Yellow cymbal marker (`.chart` pro drums).
    YellowCymbalMarker,
    /// Blue cymbal marker (`.chart` pro drums).
    BlueCymbalMarker,
    /// Green cymbal marker (`.chart` pro drums).
    GreenCymbalMarker,
    /// Accent marker on the red pad.
    AccentRed,
    /// Accent marker on the yellow pad.
    AccentYellow,
    /// Accent marker on the blue pad.
    AccentBlue,
    /// Accent marker on lane 4.
    AccentFourLaneGreen,
    /// Accent marker on lane 5.
    AccentFiveLaneGreen,
    /// Ghost marker on the red pad.
    GhostRed,
    /// Ghost marker on the yellow pad.
    GhostYellow,
    /// Ghost marker on the blue pad.
    GhostBlue,
    /// Ghost marker on lane 4.
    GhostFourLaneGreen,
    /// Ghost marker on lane 5.
    GhostFiveLaneGreen,

    // Phrases.
    /// Star Power region.
    StarPower,
    /// Solo region (already merged for `.chart`).
    Solo,
    /// `.chart` `E solo` marker, merged away by the text parser.
    SoloStart,
    /// `.chart` `E soloend` marker, merged away by the text parser.
    SoloEnd,
    /// Drum freestyle region.
    DrumFreestyle,
    /// Single-note roll lane.
    FlexLaneSingle,
    /// Two-note trill lane.
    FlexLaneDouble,
}

impl RawEventKind {
    /// Whether this kind is a playable note for the given instrument family.
    #[must_use]
    pub const fn is_playable_note(self, instrument_type: InstrumentType) -> bool {
        match instrument_type {
            InstrumentType::FiveFret => matches!(
                self,
                Self::Open | Self::Green | Self::Red | Self::Yellow | Self::Blue | Self::Orange
            ),
            InstrumentType::SixFret => matches!(
                self,
                Self::Open
                    | Self::White1
                    | Self::White2
                    | Self::White3
                    | Self::Black1
                    | Self::Black2
                    | Self::Black3
            ),
            InstrumentType::Drums => matches!(
                self,
                Self::Kick
                    | Self::DoubleKick
                    | Self::RedDrum
                    | Self::YellowDrum
                    | Self::BlueDrum
                    | Self::FourLaneGreen
                    | Self::FiveLaneGreen
            ),
        }
    }

    /// Whether this kind is a kick drum note.
    #[must_use]
    pub const fn is_kick(self) -> bool {
        matches!(self, Self::Kick | Self::DoubleKick)
    }

    /// Whether this kind is one of the disco-flip register states.
    #[must_use]
    pub const fn is_disco(self) -> bool {
        matches!(
            self,
            Self::DiscoFlipOff | Self::DiscoFlipOn | Self::DiscoNoFlipOn
        )
    }

    /// Whether a `.mid` note of this kind is carried as a sustained region
    /// that must be split into zero-length per-note copies.
    #[must_use]
    pub const fn is_sustained_modifier(self) -> bool {
        matches!(
            self,
            Self::ForceFlam
                | Self::YellowTomMarker
                | Self::BlueTomMarker
                | Self::GreenTomMarker
                | Self::ForceOpen
                | Self::ForceTap
                | Self::ForceStrum
                | Self::ForceHopo
        )
    }

    /// Whether this kind is a phrase region that keeps its length.
    #[must_use]
    pub const fn is_phrase(self) -> bool {
        matches!(
            self,
            Self::StarPower
                | Self::Solo
                | Self::DrumFreestyle
                | Self::FlexLaneSingle
                | Self::FlexLaneDouble
        )
    }
}
