//! Chart-wide timeline markers: tempos, time signatures, sections and end
//! events.

/// A tempo marker.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMarker {
    /// Position in ticks.
    pub tick: i64,
    /// Beats per minute. Never zero on a successfully parsed chart.
    pub bpm: f64,
    /// Position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
}

/// A time signature marker. The denominator is always a power of two.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Position in ticks.
    pub tick: i64,
    /// Beats per measure.
    pub numerator: u32,
    /// The note value of one beat, as a power of two.
    pub denominator: u32,
    /// Position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
}

/// A named practice-mode section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Position in ticks.
    pub tick: i64,
    /// The section name as charted.
    pub name: String,
    /// Position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
}

/// An `end` event marking the intended end of the song.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndEvent {
    /// Position in ticks.
    pub tick: i64,
    /// Position in milliseconds, rounded to 3 decimal places.
    pub ms_time: f64,
}
