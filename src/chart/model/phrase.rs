//! Phrase regions: star power, solos, flex lanes and freestyle sections.

/// A timed `{tick, length}` region. `length == 0` means "single tick".
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phrase {
    /// Start position in ticks.
    pub tick: i64,
    /// Start position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
    /// Length in ticks.
    pub length: i64,
    /// Length in milliseconds, rounded to 3 decimal places.
    pub ms_length: f64,
}

impl Phrase {
    /// The half-open note window of this phrase: `[tick, tick + max(length, 1))`.
    ///
    /// A zero-length phrase still covers its own tick.
    #[must_use]
    pub fn note_window(&self) -> std::ops::Range<i64> {
        self.tick..self.tick + self.length.max(1)
    }
}

/// A roll/trill lane: a region where a note (or a two-note alternation)
/// auto-repeats.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlexLane {
    /// The underlying region.
    pub phrase: Phrase,
    /// `true` for a two-note alternation (trill), `false` for a single-note
    /// roll (tremolo).
    pub is_double: bool,
}

/// A drum freestyle region (activation lane or big-rock-ending).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreestyleSection {
    /// The underlying region.
    pub phrase: Phrase,
    /// `true` when the region is part of a big-rock ending rather than a
    /// score activation lane.
    pub is_coda: bool,
}
