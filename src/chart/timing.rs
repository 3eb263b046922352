//! The tempo map: converting ticks to milliseconds.
//!
//! Between consecutive tempo markers time advances linearly at
//! `60_000 / (bpm × resolution)` milliseconds per tick. All math is plain
//! IEEE-754 `f64`; rounding to the 3-decimal external convention happens
//! once, when the parsed chart is assembled.

use super::model::raw::RawTempo;

/// A monotonic tempo map over a sorted, tick-0-anchored marker list.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    resolution: i64,
    /// `(tick, bpm, ms_time)` per marker, sorted by tick.
    markers: Vec<(i64, f64, f64)>,
}

impl TempoMap {
    /// Builds the map from sorted markers. The caller guarantees a marker
    /// at tick 0 and nonzero BPMs.
    #[must_use]
    pub fn new(tempos: &[RawTempo], resolution: i64) -> Self {
        debug_assert!(tempos.first().is_some_and(|tempo| tempo.tick == 0));
        let mut markers = Vec::with_capacity(tempos.len());
        let mut ms = 0.0f64;
        let mut previous: Option<(i64, f64)> = None;
        for tempo in tempos {
            if let Some((prev_tick, prev_bpm)) = previous {
                ms += (tempo.tick - prev_tick) as f64 * ms_per_tick(prev_bpm, resolution);
            }
            markers.push((tempo.tick, tempo.bpm, ms));
            previous = Some((tempo.tick, tempo.bpm));
        }
        Self {
            resolution,
            markers,
        }
    }

    /// The absolute millisecond offset of a tick.
    #[must_use]
    pub fn ms_at(&self, tick: i64) -> f64 {
        // With duplicate markers on one tick, the last defined one wins.
        let index = self
            .markers
            .partition_point(|&(marker_tick, _, _)| marker_tick <= tick)
            .saturating_sub(1);
        let (marker_tick, bpm, ms) = self.markers[index];
        ms + (tick - marker_tick) as f64 * ms_per_tick(bpm, self.resolution)
    }

    /// The millisecond span of `[tick, tick + length)`, which may cross
    /// tempo changes.
    #[must_use]
    pub fn ms_span(&self, tick: i64, length: i64) -> f64 {
        if length == 0 {
            0.0
        } else {
            self.ms_at(tick + length) - self.ms_at(tick)
        }
    }
}

fn ms_per_tick(bpm: f64, resolution: i64) -> f64 {
    60_000.0 / (bpm * resolution as f64)
}

/// Rounds a millisecond quantity to the 3-decimal external convention.
#[must_use]
pub fn round_ms(ms: f64) -> f64 {
    (ms * 1000.0).round() / 1000.0
}
