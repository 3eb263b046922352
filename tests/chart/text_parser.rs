//! End-to-end tests for the `.chart` front of the pipeline.

use chart_rs::chart::prelude::*;
use pretty_assertions::assert_eq;

use crate::{parse_text_default, track};

const HEADER: &str = "[Song]\n{\n  Name = \"Test\"\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n";

fn chart_source(track_body: &str) -> String {
    format!("{HEADER}[ExpertSingle]\n{{\n{track_body}}}\n")
}

#[test]
fn notes_and_phrases() {
    let source = chart_source(
        "  0 = N 0 96\n  192 = N 1 0\n  192 = N 2 0\n  384 = S 2 768\n  384 = N 3 0\n",
    );
    let chart = parse_text_default(&source);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);

    assert_eq!(track.note_event_groups.len(), 3);
    assert_eq!(track.note_event_groups[0][0].note_type, NoteType::Green);
    assert_eq!(track.note_event_groups[0][0].length, 96);
    assert_eq!(track.note_event_groups[0][0].ms_length, 250.0);
    let chord: Vec<NoteType> = track.note_event_groups[1]
        .iter()
        .map(|note| note.note_type)
        .collect();
    assert_eq!(chord, vec![NoteType::Red, NoteType::Yellow]);

    assert_eq!(track.star_power_sections.len(), 1);
    assert_eq!(track.star_power_sections[0].tick, 384);
    assert_eq!(track.star_power_sections[0].length, 768);
    assert_eq!(track.star_power_sections[0].ms_time, 1000.0);
}

#[test]
fn solo_phrase_includes_the_final_tick() {
    let source = chart_source("  100 = E solo\n  150 = N 0 0\n  200 = E soloend\n");
    let chart = parse_text_default(&source);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.solo_sections.len(), 1);
    assert_eq!(track.solo_sections[0].tick, 100);
    assert_eq!(track.solo_sections[0].length, 101);
}

#[test]
fn global_events_are_routed() {
    let source = format!(
        "{HEADER}[Events]\n{{\n  0 = E \"section Intro\"\n  384 = E \"prc_verse\"\n  768 = E \"end\"\n  200 = E \"lyric Hel-\"\n}}\n[ExpertSingle]\n{{\n  0 = N 0 0\n}}\n"
    );
    let chart = parse_text_default(&source);
    assert_eq!(
        chart
            .sections
            .iter()
            .map(|section| (section.tick, section.name.as_str()))
            .collect::<Vec<_>>(),
        vec![(0, "Intro"), (384, "verse")]
    );
    assert_eq!(chart.end_events.len(), 1);
    assert_eq!(chart.end_events[0].tick, 768);
    assert!(chart.has_vocals);
}

#[test]
fn disco_flip_routes_to_the_right_difficulty() {
    let source = format!(
        "{HEADER}[Events]\n{{\n  0 = E \"mix 3 drums0d\"\n  384 = E \"mix 3 drums0\"\n}}\n[ExpertDrums]\n{{\n  0 = N 1 0\n  192 = N 1 0\n  384 = N 1 0\n}}\n[HardDrums]\n{{\n  0 = N 1 0\n}}\n"
    );
    let chart = parse_text_default(&source);
    let expert = track(&chart, Instrument::Drums, Difficulty::Expert);
    assert!(expert.note_event_groups[0][0]
        .flags
        .contains(NoteFlags::DISCO));
    assert!(expert.note_event_groups[1][0]
        .flags
        .contains(NoteFlags::DISCO));
    // End-exclusive: the note at the `mix … drums0` tick is clean.
    assert!(!expert.note_event_groups[2][0]
        .flags
        .contains(NoteFlags::DISCO));
    // The expert-only flip does not leak onto hard.
    let hard = track(&chart, Instrument::Drums, Difficulty::Hard);
    assert!(!hard.note_event_groups[0][0]
        .flags
        .contains(NoteFlags::DISCO));
}

#[test]
fn utf16le_sources_decode() {
    let source = chart_source("  0 = N 0 0\n");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in source.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let chart = parse_chart(&bytes, ChartFormat::Chart, &IniChartModifiers::default())
        .expect("utf-16 chart must parse");
    assert_eq!(chart.resolution, 192);
    assert_eq!(
        track(&chart, Instrument::Guitar, Difficulty::Expert).note_count(),
        1
    );
}

#[test]
fn unknown_sections_are_skipped() {
    let source = format!("{HEADER}[NotARealSection]\n{{\n  0 = X 1 2\n}}\n");
    let chart = parse_text_default(&source);
    assert!(chart.tracks.is_empty());
}

#[test]
fn chart_sustains_survive_by_default() {
    // The `.chart` sustain cutoff default is 0: only zero-length sustains
    // are affected.
    let source = chart_source("  0 = N 0 1\n");
    let chart = parse_text_default(&source);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.note_event_groups[0][0].length, 1);
}

#[test]
fn sustain_cutoff_override_applies() {
    let mods = IniChartModifiers {
        sustain_cutoff_threshold: 50,
        ..Default::default()
    };
    let source = chart_source("  0 = N 0 50\n  192 = N 1 51\n");
    let chart = crate::parse_text(&source, &mods);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.note_event_groups[0][0].length, 0);
    assert_eq!(track.note_event_groups[1][0].length, 51);
}

#[test]
fn open_note_lane() {
    let source = chart_source("  0 = N 7 0\n");
    let chart = parse_text_default(&source);
    let track = track(&chart, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(track.note_event_groups[0][0].note_type, NoteType::Open);
}

#[test]
fn ghl_track_lanes() {
    let source = format!(
        "{HEADER}[ExpertGHLGuitar]\n{{\n  0 = N 0 0\n  0 = N 3 0\n  192 = N 8 0\n  384 = N 7 0\n}}\n"
    );
    let chart = parse_text_default(&source);
    let track = track(&chart, Instrument::GuitarGhl, Difficulty::Expert);
    let first: Vec<NoteType> = track.note_event_groups[0]
        .iter()
        .map(|note| note.note_type)
        .collect();
    assert_eq!(first, vec![NoteType::Black1, NoteType::White1]);
    assert_eq!(track.note_event_groups[1][0].note_type, NoteType::Black3);
    assert_eq!(track.note_event_groups[2][0].note_type, NoteType::Open);
}
