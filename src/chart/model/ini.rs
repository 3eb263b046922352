//! The `song.ini` modifiers that change how a chart is interpreted.
//!
//! The ini file itself is parsed by an external collaborator; this is the
//! record of the recognized entries, with the reference game's defaults.

/// Chart-interpretation modifiers sourced from `song.ini`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IniChartModifiers {
    /// Declared song length in milliseconds. Used only by the issue
    /// detector as the effective-length fallback.
    pub song_length: i64,
    /// Natural-HOPO threshold override in ticks; 0 means "use the format
    /// default".
    pub hopo_frequency: i64,
    /// When set (and `hopo_frequency` is 0), the HOPO threshold becomes an
    /// eighth note.
    pub eighthnote_hopo: bool,
    /// The MIDI pitch charted as the score multiplier phrase. 103 selects
    /// the legacy GH1/GH2 convention, 116 the modern one; 0 means unset.
    pub multiplier_note: i64,
    /// Sustains no longer than this many ticks are trimmed to zero. −1
    /// means "use the format default".
    pub sustain_cutoff_threshold: i64,
    /// Note groups closer than this many ticks are snapped onto one tick;
    /// 0 disables snapping.
    pub chord_snap_threshold: i64,
    /// Forces the five-lane drum kit layout.
    pub five_lane_drums: bool,
    /// Forces the four-lane pro drum kit layout.
    pub pro_drums: bool,
}

impl Default for IniChartModifiers {
    fn default() -> Self {
        Self {
            song_length: 0,
            hopo_frequency: 0,
            eighthnote_hopo: false,
            multiplier_note: 0,
            sustain_cutoff_threshold: -1,
            chord_snap_threshold: 0,
            five_lane_drums: false,
            pro_drums: false,
        }
    }
}

impl IniChartModifiers {
    /// The sustain-cutoff threshold in ticks for a chart of the given
    /// format, honoring the ini override.
    #[must_use]
    pub fn sustain_cutoff(&self, resolution: i64, format: crate::chart::ChartFormat) -> i64 {
        if self.sustain_cutoff_threshold >= 0 {
            self.sustain_cutoff_threshold
        } else {
            match format {
                crate::chart::ChartFormat::Mid => resolution / 3 + 1,
                crate::chart::ChartFormat::Chart => 0,
            }
        }
    }

    /// The natural-HOPO threshold in ticks for a chart of the given format,
    /// honoring the ini overrides.
    #[must_use]
    pub fn hopo_threshold(&self, resolution: i64, format: crate::chart::ChartFormat) -> i64 {
        if self.hopo_frequency != 0 {
            self.hopo_frequency
        } else if self.eighthnote_hopo {
            1 + resolution / 2
        } else {
            match format {
                crate::chart::ChartFormat::Mid => 1 + resolution / 3,
                crate::chart::ChartFormat::Chart => 65 * resolution / 192,
            }
        }
    }
}
