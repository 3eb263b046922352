//! The shared data model: what both raw parsers produce and what the
//! normalizer turns it into.

pub mod ini;
pub mod marker;
pub mod note;
pub mod phrase;
pub mod raw;
pub mod track;

use self::{
    marker::{EndEvent, Section, TempoMarker, TimeSignature},
    note::NoteEvent,
    phrase::{FlexLane, FreestyleSection, Phrase},
    track::{DrumType, Difficulty, Instrument},
};
use super::ChartFormat;

/// A fully normalized, fully timed chart.
///
/// This is the output of [`crate::chart::parse_chart`] and the input of the
/// hasher and the issue detector. All invariants of the core hold on it:
/// tempos and time signatures are non-empty and start at tick 0, note groups
/// are sorted and internally deduplicated, and phrase tables are sorted and
/// non-overlapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedChart {
    /// Ticks per beat; every tick quantity in the chart is relative to this.
    pub resolution: i64,
    /// The on-disk format the chart came from.
    pub format: ChartFormat,
    /// `[Song]` metadata key/value pairs, in file order. Empty for `.mid`.
    pub metadata: Vec<(String, String)>,
    /// Tempo markers sorted by tick, tick 0 always present.
    pub tempos: Vec<TempoMarker>,
    /// Time signature markers sorted by tick, tick 0 always present.
    pub time_signatures: Vec<TimeSignature>,
    /// Named practice-mode sections, in chart order.
    pub sections: Vec<Section>,
    /// Every `end` event of the chart, in tick order. At most the first one
    /// is meaningful; the issue detector flags the rest.
    pub end_events: Vec<EndEvent>,
    /// The inferred drum kit layout, or `None` when the chart has no drum
    /// track.
    pub drum_type: Option<DrumType>,
    /// Whether the chart carries vocals (a `PART VOCALS` track or `lyric`
    /// events).
    pub has_vocals: bool,
    /// One entry per charted instrument/difficulty combination.
    pub tracks: Vec<ParsedTrack>,
}

impl ParsedChart {
    /// Looks up the track for an instrument/difficulty combination.
    #[must_use]
    pub fn track(&self, instrument: Instrument, difficulty: Difficulty) -> Option<&ParsedTrack> {
        self.tracks
            .iter()
            .find(|track| track.instrument == instrument && track.difficulty == difficulty)
    }

    /// Returns the tick of the last note in any track, if any note exists.
    #[must_use]
    pub fn last_note_tick(&self) -> Option<i64> {
        self.tracks
            .iter()
            .filter_map(ParsedTrack::last_note_tick)
            .max()
    }
}

/// A single normalized instrument/difficulty track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedTrack {
    /// The instrument this track is charted for.
    pub instrument: Instrument,
    /// The difficulty this track is charted for.
    pub difficulty: Difficulty,
    /// Notes grouped by tick: each inner vector is one chord, sorted by note
    /// type; groups are sorted by their common tick.
    pub note_event_groups: Vec<Vec<NoteEvent>>,
    /// Star Power phrases, sorted and non-overlapping.
    pub star_power_sections: Vec<Phrase>,
    /// Star Power phrases displaced by the legacy GH1/GH2 solo swap. These
    /// are surfaced as `badStarPower` issues and excluded from the hash.
    pub rejected_star_power_sections: Vec<Phrase>,
    /// Solo phrases, sorted and non-overlapping.
    pub solo_sections: Vec<Phrase>,
    /// Roll/trill lanes, sorted and non-overlapping.
    pub flex_lanes: Vec<FlexLane>,
    /// Drum freestyle (activation lane / big-rock-ending) phrases.
    pub drum_freestyle_sections: Vec<FreestyleSection>,
}

impl ParsedTrack {
    /// Total number of notes across all chord groups.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.note_event_groups.iter().map(Vec::len).sum()
    }

    /// The tick of the last chord group, if the track has notes.
    #[must_use]
    pub fn last_note_tick(&self) -> Option<i64> {
        self.note_event_groups
            .last()
            .and_then(|group| group.first())
            .map(|note| note.tick)
    }

    /// Iterates over every note of the track in order.
    pub fn all_notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.note_event_groups.iter().flatten()
    }
}
