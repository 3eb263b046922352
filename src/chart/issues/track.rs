//! Per-track issue rules: phrase coverage, chord legality, note spacing.

use crate::chart::model::note::{NoteEvent, NoteFlags, NoteType};
use crate::chart::model::phrase::Phrase;
use crate::chart::model::track::{Difficulty, InstrumentType};
use crate::chart::model::ParsedTrack;

use super::{format_timestamp, ChartIssue, IssueKind};

/// How close two groups may be before the chart looks broken.
const BROKEN_NOTE_MS: f64 = 15.0;
/// The shadow window after a sustain's tail.
const SUSTAIN_GAP_MS: f64 = 40.0;
/// Sustains shorter than this are baby sustains.
const BABY_SUSTAIN_MS: f64 = 100.0;
/// Note-count floor for the long-track rules.
const LONG_TRACK_NOTES: usize = 50;
/// Span floor for the long-track rules.
const LONG_TRACK_MS: f64 = 60_000.0;

pub(super) fn check_track(
    track: &ParsedTrack,
    song_length_ms: Option<f64>,
    issues: &mut Vec<ChartIssue>,
) {
    let instrument_type = track.instrument.instrument_type();

    check_star_power_presence(track, instrument_type, song_length_ms, issues);
    check_empty_phrases(track, issues);
    check_rejected_star_power(track, issues);
    check_forbidden_notes(track, instrument_type, issues);
    check_invalid_chords(track, instrument_type, issues);
    check_note_spacing(track, issues);
    check_sustains(track, issues);
}

/// The span the long-track rules measure against: the declared song length
/// when the ini provides one, else the charted note span.
fn effective_length_ms(track: &ParsedTrack, song_length_ms: Option<f64>) -> f64 {
    if let Some(length) = song_length_ms {
        if length > 0.0 {
            return length;
        }
    }
    let mut notes = track.all_notes();
    let Some(first) = notes.next() else {
        return 0.0;
    };
    notes.last().map_or(0.0, |last| last.ms_time - first.ms_time)
}

fn check_star_power_presence(
    track: &ParsedTrack,
    instrument_type: InstrumentType,
    song_length_ms: Option<f64>,
    issues: &mut Vec<ChartIssue>,
) {
    let long_enough = track.note_count() > LONG_TRACK_NOTES
        && effective_length_ms(track, song_length_ms) > LONG_TRACK_MS;
    if !long_enough {
        return;
    }
    if instrument_type != InstrumentType::Drums && track.star_power_sections.is_empty() {
        issues.push(track_issue(
            track,
            IssueKind::NoStarPower,
            "This track has no Star Power".to_owned(),
        ));
    }
    if instrument_type == InstrumentType::Drums
        && track.drum_freestyle_sections.is_empty()
        && !track.star_power_sections.is_empty()
    {
        issues.push(track_issue(
            track,
            IssueKind::NoDrumActivationLanes,
            "This drum track has no activation lanes".to_owned(),
        ));
    }
}

fn check_empty_phrases(track: &ParsedTrack, issues: &mut Vec<ChartIssue>) {
    let note_ticks: Vec<i64> = track.all_notes().map(|note| note.tick).collect();
    let is_empty = |phrase: &Phrase| {
        let window = phrase.note_window();
        let start = note_ticks.partition_point(|&tick| tick < window.start);
        let end = note_ticks.partition_point(|&tick| tick < window.end);
        start == end
    };
    for phrase in &track.star_power_sections {
        if is_empty(phrase) {
            issues.push(track_issue(
                track,
                IssueKind::EmptyStarPower,
                format!(
                    "{} Star Power phrase with no notes",
                    format_timestamp(phrase.ms_time)
                ),
            ));
        }
    }
    for phrase in &track.solo_sections {
        if is_empty(phrase) {
            issues.push(track_issue(
                track,
                IssueKind::EmptySoloSection,
                format!(
                    "{} Solo section with no notes",
                    format_timestamp(phrase.ms_time)
                ),
            ));
        }
    }
    for lane in &track.flex_lanes {
        if is_empty(&lane.phrase) {
            issues.push(track_issue(
                track,
                IssueKind::EmptyFlexLane,
                format!(
                    "{} Lane with no notes",
                    format_timestamp(lane.phrase.ms_time)
                ),
            ));
        }
    }
}

fn check_rejected_star_power(track: &ParsedTrack, issues: &mut Vec<ChartIssue>) {
    for phrase in &track.rejected_star_power_sections {
        issues.push(track_issue(
            track,
            IssueKind::BadStarPower,
            format!(
                "{} Star Power phrase ignored by the legacy multiplier convention",
                format_timestamp(phrase.ms_time)
            ),
        ));
    }
}

fn check_forbidden_notes(
    track: &ParsedTrack,
    instrument_type: InstrumentType,
    issues: &mut Vec<ChartIssue>,
) {
    let difficulty = track.difficulty;
    for group in &track.note_event_groups {
        match instrument_type {
            InstrumentType::FiveFret => {
                if matches!(difficulty, Difficulty::Medium | Difficulty::Easy) {
                    if let Some(orange) = group
                        .iter()
                        .find(|note| note.note_type == NoteType::Orange)
                    {
                        issues.push(track_issue(
                            track,
                            IssueKind::DifficultyForbiddenNote,
                            format!(
                                "{} Orange is not allowed on {difficulty}",
                                format_timestamp(orange.ms_time)
                            ),
                        ));
                    }
                }
            }
            InstrumentType::SixFret => {
                if difficulty != Difficulty::Expert && group.len() >= 3 {
                    let has_white = group.iter().any(|note| is_white(note.note_type));
                    let has_black = group.iter().any(|note| is_black(note.note_type));
                    if has_white && has_black {
                        issues.push(track_issue(
                            track,
                            IssueKind::DifficultyForbiddenNote,
                            format!(
                                "{} Mixed three-note chords are not allowed on {difficulty}",
                                format_timestamp(group[0].ms_time)
                            ),
                        ));
                    }
                }
            }
            InstrumentType::Drums => {
                if difficulty != Difficulty::Expert {
                    if let Some(kick) = group
                        .iter()
                        .find(|note| note.flags.contains(NoteFlags::DOUBLE_KICK))
                    {
                        issues.push(track_issue(
                            track,
                            IssueKind::DifficultyForbiddenNote,
                            format!(
                                "{} 2x kick is not allowed on {difficulty}",
                                format_timestamp(kick.ms_time)
                            ),
                        ));
                    }
                }
                if difficulty == Difficulty::Easy
                    && group.iter().any(|note| note.note_type == NoteType::Kick)
                    && group.iter().any(|note| note.note_type != NoteType::Kick)
                {
                    issues.push(track_issue(
                        track,
                        IssueKind::DifficultyForbiddenNote,
                        format!(
                            "{} Kick-plus-pad chords are not allowed on easy",
                            format_timestamp(group[0].ms_time)
                        ),
                    ));
                }
            }
        }
    }
}

fn check_invalid_chords(
    track: &ParsedTrack,
    instrument_type: InstrumentType,
    issues: &mut Vec<ChartIssue>,
) {
    for group in &track.note_event_groups {
        let invalid = match instrument_type {
            InstrumentType::FiveFret => {
                let open_in_chord =
                    group.len() > 1 && group.iter().any(|note| note.note_type == NoteType::Open);
                group.len() >= 5 || open_in_chord
            }
            InstrumentType::SixFret => {
                let open_in_chord =
                    group.len() > 1 && group.iter().any(|note| note.note_type == NoteType::Open);
                let barre_conflict = group.len() >= 3
                    && group.iter().any(|note| note.note_type == NoteType::Black2)
                    && group.iter().any(|note| note.note_type == NoteType::White2)
                    && group.iter().any(|note| {
                        matches!(note.note_type, NoteType::Black1 | NoteType::White1)
                    });
                open_in_chord || barre_conflict
            }
            InstrumentType::Drums => {
                group
                    .iter()
                    .filter(|note| note.note_type != NoteType::Kick)
                    .count()
                    >= 3
            }
        };
        if invalid {
            issues.push(track_issue(
                track,
                IssueKind::InvalidChord,
                format!(
                    "{} This chord shape is not playable",
                    format_timestamp(group[0].ms_time)
                ),
            ));
        }
    }
}

/// Consecutive groups under 15 ms apart read as one broken note, except
/// around open-note transitions.
fn check_note_spacing(track: &ParsedTrack, issues: &mut Vec<ChartIssue>) {
    for pair in track.note_event_groups.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let delta = next[0].ms_time - current[0].ms_time;
        if delta <= 0.0 || delta > BROKEN_NOTE_MS {
            continue;
        }
        let open_adjacent = current.iter().any(|note| note.note_type == NoteType::Open)
            || next.iter().any(|note| note.note_type == NoteType::Open);
        if open_adjacent {
            continue;
        }
        issues.push(track_issue(
            track,
            IssueKind::BrokenNote,
            format!(
                "{} Note is only {delta:.0} ms after the previous one",
                format_timestamp(next[0].ms_time)
            ),
        ));
    }
}

fn check_sustains(track: &ParsedTrack, issues: &mut Vec<ChartIssue>) {
    // Active per-color shadow windows, `(color, start, end)` in ms. The
    // population is tiny, so in-place removal on a flat vector is fine.
    let mut windows: Vec<(NoteType, f64, f64)> = Vec::new();

    for (index, group) in track.note_event_groups.iter().enumerate() {
        let time = group[0].ms_time;
        windows.retain(|&(_, _, end)| end > time);
        if windows
            .iter()
            .any(|&(_, start, end)| time >= start && time < end)
        {
            issues.push(track_issue(
                track,
                IssueKind::BadSustainGap,
                format!(
                    "{} Note starts in the shadow of a sustain's tail",
                    format_timestamp(time)
                ),
            ));
        }

        for note in group {
            if note.ms_length <= 0.0 {
                continue;
            }
            let tail = note.ms_time + note.ms_length;
            windows.retain(|&(color, _, _)| color != note.note_type);
            windows.push((note.note_type, tail, tail + SUSTAIN_GAP_MS));

            if note.ms_length < BABY_SUSTAIN_MS && !next_group_is_open_lift(track, index) {
                issues.push(track_issue(
                    track,
                    IssueKind::BabySustain,
                    format!(
                        "{} Sustain is only {:.0} ms long",
                        format_timestamp(note.ms_time),
                        note.ms_length
                    ),
                ));
            }
        }
    }
}

/// The baby-sustain exemption: the next group is a single open HOPO or tap.
fn next_group_is_open_lift(track: &ParsedTrack, index: usize) -> bool {
    track
        .note_event_groups
        .get(index + 1)
        .and_then(|group| group.first())
        .is_some_and(|note: &NoteEvent| {
            note.note_type == NoteType::Open
                && note.flags.intersects(NoteFlags::HOPO | NoteFlags::TAP)
        })
}

const fn is_white(note_type: NoteType) -> bool {
    matches!(
        note_type,
        NoteType::White1 | NoteType::White2 | NoteType::White3
    )
}

const fn is_black(note_type: NoteType) -> bool {
    matches!(
        note_type,
        NoteType::Black1 | NoteType::Black2 | NoteType::Black3
    )
}

fn track_issue(track: &ParsedTrack, kind: IssueKind, description: String) -> ChartIssue {
    ChartIssue {
        kind,
        instrument: Some(track.instrument),
        difficulty: Some(track.difficulty),
        description,
    }
}
