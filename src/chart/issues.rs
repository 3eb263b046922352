//! Rule-based issue detection over the normalized chart.
//!
//! Nothing here ever aborts: every rule appends [`ChartIssue`] entries to an
//! order-stable list. Chart-wide checks carry no instrument or difficulty;
//! per-instrument and per-track checks carry one or both. Issues anchored to
//! a chart position prefix their description with a `[HH:MM:SS.cc]` time.

mod track;

use super::model::track::{Difficulty, Instrument};
use super::model::ParsedChart;

/// The machine-readable kind of a chart issue.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    /// A time signature marker is not on a measure boundary.
    MisalignedTimeSignature,
    /// The chart has no notes on any track and no vocals.
    NoNotes,
    /// An instrument has non-expert tracks but no playable expert track.
    NoExpert,
    /// A lower difficulty is identical to expert.
    DifficultyNotReduced,
    /// The chart still carries the default 120 BPM / 4-4 grid.
    IsDefaultBpm,
    /// The chart has no practice-mode sections.
    NoSections,
    /// A surplus or misplaced `end` event.
    BadEndEvent,
    /// The first note arrives in under a second.
    SmallLeadingSilence,
    /// A long track with no Star Power.
    NoStarPower,
    /// A Star Power phrase with no notes inside it.
    EmptyStarPower,
    /// A solo phrase with no notes inside it.
    EmptySoloSection,
    /// A flex lane with no notes inside it.
    EmptyFlexLane,
    /// A Star Power phrase displaced by the legacy solo swap.
    BadStarPower,
    /// A long drum track with Star Power but no activation lanes.
    NoDrumActivationLanes,
    /// A note that is not allowed on its difficulty.
    DifficultyForbiddenNote,
    /// A chord shape that is not playable.
    InvalidChord,
    /// Two note groups implausibly close together.
    BrokenNote,
    /// A note starting in the shadow of a sustain's tail.
    BadSustainGap,
    /// A sustain too short to be meaningful.
    BabySustain,
}

/// One detected issue, with enough locator information for a UI to point at
/// the offense.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartIssue {
    /// What rule fired.
    pub kind: IssueKind,
    /// The instrument the issue belongs to; `None` for chart-wide issues.
    pub instrument: Option<Instrument>,
    /// The difficulty the issue belongs to; `None` for chart-wide and
    /// per-instrument issues.
    pub difficulty: Option<Difficulty>,
    /// A human-readable description, time-prefixed when anchored.
    pub description: String,
}

/// A per-track hash, as computed by [`super::hash_track`], for the
/// reduction checks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackHashId {
    /// The hashed track's instrument.
    pub instrument: Instrument,
    /// The hashed track's difficulty.
    pub difficulty: Difficulty,
    /// The track hash string.
    pub hash: String,
}

/// Runs every issue rule over a normalized chart.
///
/// `song_length_ms` is the `song.ini` declared length, used as the
/// effective-length fallback for the span-based rules; `track_hashes`
/// feeds the difficulty-reduction check.
#[must_use]
pub fn find_issues(
    chart: &ParsedChart,
    song_length_ms: Option<f64>,
    track_hashes: &[TrackHashId],
) -> Vec<ChartIssue> {
    let mut issues = Vec::new();

    check_time_signatures(chart, &mut issues);
    check_no_notes(chart, &mut issues);
    check_default_bpm(chart, &mut issues);
    check_sections(chart, &mut issues);
    check_end_events(chart, &mut issues);
    check_leading_silence(chart, &mut issues);
    check_difficulties(chart, track_hashes, &mut issues);

    for parsed_track in &chart.tracks {
        track::check_track(parsed_track, song_length_ms, &mut issues);
    }
    issues
}

/// Formats a millisecond offset as `[HH:MM:SS.cc]`.
pub(crate) fn format_timestamp(ms: f64) -> String {
    let total_centis = (ms / 10.0).round().max(0.0) as i64;
    let (centis, total_seconds) = (total_centis % 100, total_centis / 100);
    let (seconds, total_minutes) = (total_seconds % 60, total_seconds / 60);
    let (minutes, hours) = (total_minutes % 60, total_minutes / 60);
    format!("[{hours:02}:{minutes:02}:{seconds:02}.{centis:02}]")
}

fn chart_wide(kind: IssueKind, description: String) -> ChartIssue {
    ChartIssue {
        kind,
        instrument: None,
        difficulty: None,
        description,
    }
}

/// Walks a running next-bar tick; markers off the grid are flagged and
/// skipped so later markers get a fair chance.
fn check_time_signatures(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    let resolution = chart.resolution as f64;
    let mut next_bar = 0.0f64;
    let mut bar_length: Option<f64> = None;
    for ts in &chart.time_signatures {
        if let Some(length) = bar_length {
            while next_bar < ts.tick as f64 {
                next_bar += length;
            }
        }
        if ts.tick as f64 != next_bar {
            issues.push(chart_wide(
                IssueKind::MisalignedTimeSignature,
                format!(
                    "{} Time signature {}/{} at tick {} is not on a measure boundary",
                    format_timestamp(ts.ms_time),
                    ts.numerator,
                    ts.denominator,
                    ts.tick
                ),
            ));
            continue;
        }
        bar_length =
            Some(resolution * 4.0 * f64::from(ts.numerator) / f64::from(ts.denominator));
    }
}

fn check_no_notes(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    let any_notes = chart.tracks.iter().any(|track| track.note_count() > 0);
    if !any_notes && !chart.has_vocals {
        issues.push(chart_wide(
            IssueKind::NoNotes,
            "This chart has no notes".to_owned(),
        ));
    }
}

fn check_default_bpm(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    let default_tempo = chart.tempos.len() == 1 && chart.tempos[0].bpm == 120.0;
    let default_signature = chart.time_signatures.len() == 1
        && chart.time_signatures[0].numerator == 4
        && chart.time_signatures[0].denominator == 4;
    if default_tempo && default_signature {
        issues.push(chart_wide(
            IssueKind::IsDefaultBpm,
            "This chart uses the default 120 BPM and 4/4 time signature; it is unlikely to be tempo-mapped".to_owned(),
        ));
    }
}

fn check_sections(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    if chart.sections.is_empty() {
        issues.push(chart_wide(
            IssueKind::NoSections,
            "This chart has no sections".to_owned(),
        ));
    }
}

fn check_end_events(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    let last_note_tick = chart.last_note_tick();
    for (index, end) in chart.end_events.iter().enumerate() {
        if index > 0 {
            issues.push(chart_wide(
                IssueKind::BadEndEvent,
                format!(
                    "{} Surplus end event; only the first one is honored",
                    format_timestamp(end.ms_time)
                ),
            ));
        } else if last_note_tick.is_some_and(|last| end.tick < last) {
            issues.push(chart_wide(
                IssueKind::BadEndEvent,
                format!(
                    "{} The end event occurs before the last note",
                    format_timestamp(end.ms_time)
                ),
            ));
        }
    }
}

fn check_leading_silence(chart: &ParsedChart, issues: &mut Vec<ChartIssue>) {
    let first_note_ms = chart
        .tracks
        .iter()
        .filter_map(|track| track.note_event_groups.first())
        .filter_map(|group| group.first())
        .map(|note| note.ms_time)
        .fold(f64::INFINITY, f64::min);
    if first_note_ms < 1000.0 {
        issues.push(chart_wide(
            IssueKind::SmallLeadingSilence,
            format!(
                "{} The first note arrives less than a second into the song",
                format_timestamp(first_note_ms)
            ),
        ));
    }
}

fn check_difficulties(
    chart: &ParsedChart,
    track_hashes: &[TrackHashId],
    issues: &mut Vec<ChartIssue>,
) {
    let hash_of = |instrument: Instrument, difficulty: Difficulty| {
        track_hashes
            .iter()
            .find(|entry| entry.instrument == instrument && entry.difficulty == difficulty)
            .map(|entry| entry.hash.as_str())
    };
    for instrument in Instrument::ALL {
        let expert_notes = chart
            .track(instrument, Difficulty::Expert)
            .map_or(0, super::model::ParsedTrack::note_count);
        let lower_with_notes = chart
            .tracks
            .iter()
            .filter(|track| track.instrument == instrument)
            .any(|track| track.difficulty != Difficulty::Expert && track.note_count() > 0);
        if expert_notes == 0 && lower_with_notes {
            issues.push(ChartIssue {
                kind: IssueKind::NoExpert,
                instrument: Some(instrument),
                difficulty: None,
                description: format!("{instrument} is charted but has no expert difficulty"),
            });
        }

        let Some(expert_hash) = hash_of(instrument, Difficulty::Expert) else {
            continue;
        };
        for track in &chart.tracks {
            if track.instrument != instrument
                || track.difficulty == Difficulty::Expert
                || track.note_count() <= 20
            {
                continue;
            }
            if hash_of(instrument, track.difficulty) == Some(expert_hash) {
                issues.push(ChartIssue {
                    kind: IssueKind::DifficultyNotReduced,
                    instrument: Some(instrument),
                    difficulty: Some(track.difficulty),
                    description: format!(
                        "{instrument} {} is identical to the expert track",
                        track.difficulty
                    ),
                });
            }
        }
    }
}
