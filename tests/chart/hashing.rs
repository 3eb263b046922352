//! BTRACK serialization and hash behavior.

use chart_rs::chart::prelude::*;
use pretty_assertions::assert_eq;

use crate::{parse_text, parse_text_default};

const HEADER: &str = "[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n";

fn expert_guitar_hash(body: &str) -> TrackHash {
    let source = format!("{HEADER}[ExpertSingle]\n{{\n{body}}}\n");
    let chart = parse_text_default(&source);
    hash_track(&chart, Instrument::Guitar, Difficulty::Expert).expect("track must exist")
}

#[test]
fn hash_is_deterministic() {
    let first = expert_guitar_hash("  0 = N 0 96\n  192 = N 1 0\n");
    let second = expert_guitar_hash("  0 = N 0 96\n  192 = N 1 0\n");
    assert_eq!(first, second);
    // 32 bytes of BLAKE3 in unpadded base64url.
    assert_eq!(first.hash.len(), 43);
    assert!(!first.hash.contains('='));
}

#[test]
fn missing_track_is_an_error() {
    let chart = parse_text_default(&format!("{HEADER}[ExpertSingle]\n{{\n  0 = N 0 0\n}}\n"));
    let error = hash_track(&chart, Instrument::Bass, Difficulty::Expert).unwrap_err();
    assert_eq!(
        error,
        HashError::TrackNotFound {
            instrument: Instrument::Bass,
            difficulty: Difficulty::Expert,
        }
    );
}

#[test]
fn btrack_layout_prefix() {
    let TrackHash { bytes, .. } = expert_guitar_hash("  0 = N 0 0\n");
    // Magic, big-endian.
    assert_eq!(&bytes[0..4], b"CHNF");
    // Version and resolution, little-endian.
    assert_eq!(&bytes[4..8], &20_240_320u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &192u32.to_le_bytes());
    // One tempo record: tick 0, 120 BPM.
    assert_eq!(&bytes[12..16], &1u32.to_le_bytes());
    assert_eq!(&bytes[16..24], &0i64.to_le_bytes());
    assert_eq!(&bytes[24..32], &120.0f64.to_le_bytes());
    // One time signature record: tick 0, 4/4.
    assert_eq!(&bytes[32..36], &1u32.to_le_bytes());
    assert_eq!(&bytes[36..44], &0i64.to_le_bytes());
    assert_eq!(&bytes[44..48], &4u32.to_le_bytes());
    assert_eq!(&bytes[48..52], &4u32.to_le_bytes());
    // Empty star power, solo, flex and freestyle tables.
    assert_eq!(&bytes[52..68], &[0u8; 16]);
    // One note record: tick 0, length 0, green, strum.
    assert_eq!(&bytes[68..72], &1u32.to_le_bytes());
    assert_eq!(&bytes[72..80], &0i64.to_le_bytes());
    assert_eq!(&bytes[80..88], &0i64.to_le_bytes());
    assert_eq!(&bytes[88..92], &2u32.to_le_bytes());
    assert_eq!(&bytes[92..96], &1u32.to_le_bytes());
    assert_eq!(bytes.len(), 96);
}

#[test]
fn hash_is_sensitive_to_note_changes() {
    let base = expert_guitar_hash("  0 = N 0 96\n  192 = N 1 0\n");
    let moved = expert_guitar_hash("  0 = N 0 96\n  193 = N 1 0\n");
    let recolored = expert_guitar_hash("  0 = N 2 96\n  192 = N 1 0\n");
    let lengthened = expert_guitar_hash("  0 = N 0 97\n  192 = N 1 0\n");
    let tapped = expert_guitar_hash("  0 = N 0 96\n  192 = N 1 0\n  192 = N 6 0\n");
    assert_ne!(base.hash, moved.hash);
    assert_ne!(base.hash, recolored.hash);
    assert_ne!(base.hash, lengthened.hash);
    assert_ne!(base.hash, tapped.hash);
}

#[test]
fn hash_is_sensitive_to_kept_markers() {
    let base = expert_guitar_hash("  0 = N 0 0\n");
    let source = format!(
        "[Song]\n{{\n  Resolution = 192\n}}\n[SyncTrack]\n{{\n  0 = B 140000\n  0 = TS 4\n}}\n[ExpertSingle]\n{{\n  0 = N 0 0\n}}\n"
    );
    let chart = parse_text_default(&source);
    let retempoed = hash_track(&chart, Instrument::Guitar, Difficulty::Expert).unwrap();
    assert_ne!(base.hash, retempoed.hash);
}

#[test]
fn non_last_marker_on_a_tick_does_not_change_the_hash() {
    let base = expert_guitar_hash("  0 = N 0 0\n");
    let source = format!(
        "[Song]\n{{\n  Resolution = 192\n}}\n[SyncTrack]\n{{\n  0 = B 99000\n  0 = B 120000\n  0 = TS 4\n}}\n[ExpertSingle]\n{{\n  0 = N 0 0\n}}\n"
    );
    let chart = parse_text_default(&source);
    // The overridden 99 BPM marker is retained on the chart…
    assert_eq!(chart.tempos.len(), 2);
    let shadowed = hash_track(&chart, Instrument::Guitar, Difficulty::Expert).unwrap();
    // …but only the last marker at the tick reaches the hash preimage.
    assert_eq!(base.hash, shadowed.hash);
}

#[test]
fn empty_phrases_prune_out_of_the_hash() {
    let base = expert_guitar_hash("  0 = N 0 0\n");
    // The star power phrase covers [960, 1060): no notes inside.
    let pruned = expert_guitar_hash("  0 = N 0 0\n  960 = S 2 100\n");
    assert_eq!(base.hash, pruned.hash);
    // A phrase that does cover a note changes the hash.
    let covering = expert_guitar_hash("  0 = N 0 0\n  0 = S 2 100\n");
    assert_ne!(base.hash, covering.hash);
}

#[test]
fn phrase_payloads_reach_the_hash() {
    let single = {
        let source = format!("{HEADER}[ExpertDrums]\n{{\n  0 = N 1 0\n  0 = S 65 100\n}}\n");
        let chart = parse_text_default(&source);
        hash_track(&chart, Instrument::Drums, Difficulty::Expert).unwrap()
    };
    let double = {
        let source = format!("{HEADER}[ExpertDrums]\n{{\n  0 = N 1 0\n  0 = S 66 100\n}}\n");
        let chart = parse_text_default(&source);
        hash_track(&chart, Instrument::Drums, Difficulty::Expert).unwrap()
    };
    assert_ne!(single.hash, double.hash);
}

#[test]
fn format_parity_between_chart_and_mid() {
    use crate::smf::{default_tempo_track, smf, TrackBuilder};

    // The same two notes charted both ways, with the sustain cutoff pinned
    // so the format defaults cannot diverge.
    let mods = IniChartModifiers {
        sustain_cutoff_threshold: 0,
        ..Default::default()
    };

    let text = format!("{HEADER}[ExpertSingle]\n{{\n  0 = N 0 96\n  192 = N 1 0\n}}\n");
    let from_text = parse_text(&text, &mods);

    let mut guitar = TrackBuilder::new().name("PART GUITAR");
    guitar.note(0, 96, 96);
    guitar.note(192, 0, 97);
    let bytes = smf(192, vec![default_tempo_track(), guitar.finish()]);
    let from_mid =
        parse_chart(&bytes, ChartFormat::Mid, &mods).expect("mid fixture must parse");

    let text_track = crate::track(&from_text, Instrument::Guitar, Difficulty::Expert);
    let mid_track = crate::track(&from_mid, Instrument::Guitar, Difficulty::Expert);
    assert_eq!(text_track.note_event_groups, mid_track.note_event_groups);

    let text_hash = hash_track(&from_text, Instrument::Guitar, Difficulty::Expert).unwrap();
    let mid_hash = hash_track(&from_mid, Instrument::Guitar, Difficulty::Expert).unwrap();
    assert_eq!(text_hash.hash, mid_hash.hash);
}
