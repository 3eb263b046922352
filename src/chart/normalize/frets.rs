//! Fret modifier resolution: open promotion and strum/HOPO/tap.

use crate::chart::model::note::{NoteFlags, NoteType};
use crate::chart::model::raw::{RawEvent, RawEventKind};
use crate::chart::ChartFormat;

use super::ProtoNote;

/// Resolves one fret track's tick groups into proto notes.
///
/// `hopo_threshold` is the natural-HOPO window in ticks.
pub(super) fn resolve(
    groups: &[(i64, Vec<RawEvent>)],
    format: ChartFormat,
    hopo_threshold: i64,
) -> Vec<Vec<ProtoNote>> {
    let mut out: Vec<Vec<ProtoNote>> = Vec::new();
    // The previous note group's tick, colorset mask, and whether it was a
    // chord — the state natural-HOPO inference looks back at.
    let mut previous: Option<(i64, u32, bool)> = None;

    for (tick, events) in groups {
        let mut notes: Vec<(NoteType, i64)> = Vec::new();
        for event in events {
            let Some(note_type) = fret_note_type(event.kind) else {
                continue;
            };
            // Duplicate colors in one group keep the longest sustain.
            match notes.iter_mut().find(|(existing, _)| *existing == note_type) {
                Some((_, length)) => *length = (*length).max(event.length),
                None => notes.push((note_type, event.length)),
            }
        }
        if notes.is_empty() {
            continue;
        }

        let has = |wanted: RawEventKind| events.iter().any(|event| event.kind == wanted);
        if has(RawEventKind::ForceOpen) {
            // The longest note of the group is promoted to open; the rest
            // are removed with the marker.
            let length = notes.iter().map(|&(_, length)| length).max().unwrap_or(0);
            notes = vec![(NoteType::Open, length)];
        }

        let mask = notes
            .iter()
            .fold(0u32, |mask, &(note_type, _)| mask | 1 << note_type.as_u32());
        let single = notes.len() == 1;
        let natural = previous.is_some_and(|(prev_tick, prev_mask, prev_chord)| {
            tick - prev_tick <= hopo_threshold
                && single
                && mask != prev_mask
                && !(format == ChartFormat::Mid && prev_chord && mask & prev_mask == mask)
        });

        let flag = if has(RawEventKind::ForceTap) {
            // Tap notes never inherit HOPO.
            NoteFlags::TAP
        } else if has(RawEventKind::ForceHopo) {
            NoteFlags::HOPO
        } else if has(RawEventKind::ForceStrum) {
            NoteFlags::STRUM
        } else if has(RawEventKind::ForceUnnatural) != natural {
            NoteFlags::HOPO
        } else {
            NoteFlags::STRUM
        };

        out.push(
            notes
                .iter()
                .map(|&(note_type, length)| ProtoNote {
                    tick: *tick,
                    length,
                    note_type,
                    flags: flag,
                })
                .collect(),
        );
        previous = Some((*tick, mask, notes.len() > 1));
    }
    out
}

/// Maps a raw fret lane onto its canonical color, for both 5- and 6-fret
/// families.
fn fret_note_type(kind: RawEventKind) -> Option<NoteType> {
    let note_type = match kind {
        RawEventKind::Open => NoteType::Open,
        RawEventKind::Green => NoteType::Green,
        RawEventKind::Red => NoteType::Red,
        RawEventKind::Yellow => NoteType::Yellow,
        RawEventKind::Blue => NoteType::Blue,
        RawEventKind::Orange => NoteType::Orange,
        RawEventKind::White1 => NoteType::White1,
        RawEventKind::White2 => NoteType::White2,
        RawEventKind::White3 => NoteType::White3,
        RawEventKind::Black1 => NoteType::Black1,
        RawEventKind::Black2 => NoteType::Black2,
        RawEventKind::Black3 => NoteType::Black3,
        _ => return None,
    };
    Some(note_type)
}
