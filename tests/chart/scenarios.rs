//! The end-to-end reference scenarios and boundary cases.

use chart_rs::chart::prelude::*;
use pretty_assertions::assert_eq;

use crate::smf::{default_tempo_track, smf, TrackBuilder};
use crate::{parse_mid, parse_text, parse_text_default, track};

/// S1: a two-note `.chart` with the format-default HOPO threshold. The
/// second note is 192 ticks out — past the 65-tick window — so both notes
/// are strums.
#[test]
fn s1_two_note_chart() {
    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[Events]\n{\n}\n[ExpertSingle]\n{\n  0 = N 0 0\n  192 = N 1 96\n}\n";
    let chart = parse_text_default(source);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.note_event_groups.len(), 2);

    let first = track.note_event_groups[0][0];
    assert_eq!(first.note_type, NoteType::Green);
    assert_eq!(first.ms_time, 0.0);
    assert_eq!(first.length, 0);
    assert_eq!(first.flags, NoteFlags::STRUM);

    let second = track.note_event_groups[1][0];
    assert_eq!(second.note_type, NoteType::Red);
    assert_eq!(second.ms_time, 500.0);
    assert_eq!(second.flags, NoteFlags::STRUM);
}

/// S2: legacy GH1/GH2 Star-Power recovery changes the track hash.
#[test]
fn s2_legacy_star_power_changes_the_hash() {
    let build = || {
        let mut guitar = TrackBuilder::new().name("PART GUITAR");
        guitar.note(0, 0, 96);
        guitar.note(192, 0, 97);
        guitar.note(384, 0, 98);
        guitar.note(0, 480, 116); // star power
        guitar.note(0, 200, 103); // solo
        smf(192, vec![default_tempo_track(), guitar.finish()])
    };

    let modern = parse_mid(&build(), &IniChartModifiers::default());
    let legacy_mods = IniChartModifiers {
        multiplier_note: 103,
        ..Default::default()
    };
    let legacy = parse_mid(&build(), &legacy_mods);

    let modern_track = track(&modern, Instrument::Guitar, Difficulty::Expert);
    let legacy_track = track(&legacy, Instrument::Guitar, Difficulty::Expert);
    // The modern reading keeps the 116 phrase; the legacy reading promotes
    // the solo and rejects the real Star Power.
    assert_eq!(modern_track.star_power_sections[0].length, 480);
    assert!(modern_track.rejected_star_power_sections.is_empty());
    assert_eq!(legacy_track.star_power_sections[0].length, 200);
    assert_eq!(legacy_track.rejected_star_power_sections.len(), 1);

    let modern_hash = hash_track(&modern, Instrument::Guitar, Difficulty::Expert).unwrap();
    let legacy_hash = hash_track(&legacy, Instrument::Guitar, Difficulty::Expert).unwrap();
    assert_ne!(modern_hash.hash, legacy_hash.hash);

    // The displaced phrase surfaces as a badStarPower issue.
    let issues = find_issues(&legacy, None, &[]);
    assert!(issues
        .iter()
        .any(|issue| issue.kind == IssueKind::BadStarPower));
}

/// S2 heuristic: with no multiplier note declared, zero Star Power and
/// more than one solo also trigger the swap.
#[test]
fn s2_heuristic_swap() {
    let mut guitar = TrackBuilder::new().name("PART GUITAR");
    guitar.note(0, 0, 96);
    guitar.note(192, 0, 97);
    guitar.note(0, 100, 103);
    guitar.note(192, 100, 103);
    let bytes = smf(192, vec![default_tempo_track(), guitar.finish()]);
    let chart = parse_mid(&bytes, &IniChartModifiers::default());
    let track1 = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track1.star_power_sections.len(), 2);
    assert!(track1.solo_sections.is_empty());

    // A single solo with no Star Power stays a solo.
    let mut guitar = TrackBuilder::new().name("PART GUITAR");
    guitar.note(0, 0, 96);
    guitar.note(0, 100, 103);
    let bytes = smf(192, vec![default_tempo_track(), guitar.finish()]);
    let chart = parse_mid(&bytes, &IniChartModifiers::default());
    let track2 = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert!(track2.star_power_sections.is_empty());
    assert_eq!(track2.solo_sections.len(), 1);
}

/// S3: the tom/cymbal marker sense is inverted between the two formats.
#[test]
fn s3_tom_cymbal_marker_sense() {
    let mods = IniChartModifiers {
        pro_drums: true,
        ..Default::default()
    };

    let mut drums = TrackBuilder::new().name("PART DRUMS");
    drums.note(0, 0, 98); // expert yellow, no tom marker
    let bytes = smf(192, vec![default_tempo_track(), drums.finish()]);
    let from_mid = parse_mid(&bytes, &mods);
    let mid_note = track(&from_mid, Instrument::Drums, Difficulty::Expert).note_event_groups[0][0];
    assert_eq!(mid_note.note_type, NoteType::YellowDrum);
    assert!(mid_note.flags.contains(NoteFlags::CYMBAL));

    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[ExpertDrums]\n{\n  0 = N 2 0\n}\n";
    let from_text = parse_text(source, &mods);
    let text_note =
        track(&from_text, Instrument::Drums, Difficulty::Expert).note_event_groups[0][0];
    assert_eq!(text_note.note_type, NoteType::YellowDrum);
    assert!(text_note.flags.contains(NoteFlags::TOM));
}

/// S4: chord snapping with a threshold of 10 ticks.
#[test]
fn s4_chord_snap() {
    let mods = IniChartModifiers {
        chord_snap_threshold: 10,
        ..Default::default()
    };
    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[ExpertSingle]\n{\n  100 = N 0 0\n  100 = N 5 0\n  105 = N 1 0\n  120 = N 2 0\n}\n";
    let chart = parse_text(source, &mods);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    let ticks: Vec<i64> = track
        .note_event_groups
        .iter()
        .map(|group| group[0].tick)
        .collect();
    assert_eq!(ticks, vec![100, 120]);
    // The forced group at 100 passes its HOPO state to the merged note.
    assert!(track.note_event_groups[0]
        .iter()
        .all(|note| note.flags == NoteFlags::HOPO));
}

/// S5: a time signature off the measure grid.
#[test]
fn s5_misaligned_time_signature() {
    let source = "[Song]\n{\n  Resolution = 480\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n  1 = TS 3\n}\n[ExpertSingle]\n{\n  0 = N 0 0\n}\n";
    let chart = parse_text_default(source);
    let issues = find_issues(&chart, None, &[]);
    let misaligned: Vec<_> = issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::MisalignedTimeSignature)
        .collect();
    assert_eq!(misaligned.len(), 1);
    let expected_ms = chart.time_signatures[1].ms_time;
    assert!(misaligned[0]
        .description
        .starts_with(&timestamp(expected_ms)));
}

/// Boundary (1): `[Song]` alone is an invalid chart.
#[test]
fn boundary_song_only_fails() {
    let error = parse_chart(
        b"[Song]\n{\n}\n",
        ChartFormat::Chart,
        &IniChartModifiers::default(),
    )
    .unwrap_err();
    assert!(matches!(error, ParseError::Text(_)));
}

/// Boundary (3)/(4): the natural-HOPO window at resolution 192.
#[test]
fn boundary_hopo_window() {
    // Same color 100 ticks apart: strum.
    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[ExpertSingle]\n{\n  0 = N 0 0\n  100 = N 0 0\n}\n";
    let chart = parse_text_default(source);
    let track_ref = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track_ref.note_event_groups[1][0].flags, NoteFlags::STRUM);

    // A different single color 64 ticks out: HOPO.
    let source = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[ExpertSingle]\n{\n  0 = N 0 0\n  64 = N 1 0\n}\n";
    let chart = parse_text_default(source);
    let track_ref = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track_ref.note_event_groups[1][0].flags, NoteFlags::HOPO);
}

/// Boundary (5): `forceOpen` keeps the longest note of the group.
#[test]
fn boundary_force_open_promotion() {
    let mods = IniChartModifiers {
        sustain_cutoff_threshold: 0,
        ..Default::default()
    };
    let mut guitar = TrackBuilder::new().name("PART GUITAR");
    guitar.note(0, 10, 96);
    guitar.note(0, 40, 97);
    guitar.phase_shift(0, 3, 0x01, true);
    guitar.phase_shift(10, 3, 0x01, false);
    let bytes = smf(192, vec![default_tempo_track(), guitar.finish()]);
    let chart = parse_mid(&bytes, &mods);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.note_event_groups[0].len(), 1);
    assert_eq!(track.note_event_groups[0][0].note_type, NoteType::Open);
    assert_eq!(track.note_event_groups[0][0].length, 40);
}

fn timestamp(ms: f64) -> String {
    let total_centis = (ms / 10.0).round().max(0.0) as i64;
    let (centis, total_seconds) = (total_centis % 100, total_centis / 100);
    let (seconds, total_minutes) = (total_seconds % 60, total_seconds / 60);
    let (minutes, hours) = (total_minutes % 60, total_minutes / 60);
    format!("[{hours:02}:{minutes:02}:{seconds:02}.{centis:02}]")
}
