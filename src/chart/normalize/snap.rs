//! Chord snapping: note groups within the snap threshold merge onto the
//! earlier group's tick.

use crate::chart::model::note::{NoteFlags, NoteType};
use crate::chart::model::track::InstrumentType;

use super::ProtoNote;

const DISCO_BITS: NoteFlags = NoteFlags::DISCO.union(NoteFlags::DISCO_NOFLIP);
const STRUM_BITS: NoteFlags = NoteFlags::STRUM
    .union(NoteFlags::HOPO)
    .union(NoteFlags::TAP);

/// Merges note groups closer than `threshold` ticks onto the last kept
/// group. A threshold of 0 disables snapping.
pub(super) fn snap_chords(
    groups: &mut Vec<Vec<ProtoNote>>,
    threshold: i64,
    instrument_type: InstrumentType,
) {
    if threshold <= 0 {
        return;
    }
    let mut kept: Vec<Vec<ProtoNote>> = Vec::with_capacity(groups.len());
    for group in groups.drain(..) {
        match kept.last_mut() {
            Some(last) if group[0].tick - last[0].tick <= threshold => {
                merge_group(last, group, instrument_type);
            }
            _ => kept.push(group),
        }
    }
    *groups = kept;
}

fn merge_group(kept: &mut Vec<ProtoNote>, incoming: Vec<ProtoNote>, instrument_type: InstrumentType) {
    let kept_tick = kept[0].tick;
    // The merged chord adopts the earliest tick and the shortest length.
    let min_length = kept
        .iter()
        .chain(incoming.iter())
        .map(|note| note.length)
        .min()
        .unwrap_or(0);

    match instrument_type {
        InstrumentType::Drums => {
            let group_disco = normalize_disco(
                kept.iter()
                    .chain(incoming.iter())
                    .fold(NoteFlags::empty(), |bits, note| {
                        bits | (note.flags & DISCO_BITS)
                    }),
            );
            for mut note in incoming {
                note.tick = kept_tick;
                // Per-color flags come from the kept group when it already
                // has this color.
                if let Some(existing) = kept
                    .iter()
                    .find(|kept_note| kept_note.note_type == note.note_type)
                {
                    note.flags = existing.flags;
                }
                kept.push(note);
            }
            for note in kept.iter_mut() {
                if matches!(note.note_type, NoteType::RedDrum | NoteType::YellowDrum) {
                    note.flags = (note.flags - DISCO_BITS) | group_disco;
                }
            }
        }
        _ => {
            let kept_strum = kept[0].flags & STRUM_BITS;
            for mut note in incoming {
                note.tick = kept_tick;
                note.flags = (note.flags - STRUM_BITS) | kept_strum;
                kept.push(note);
            }
        }
    }

    for note in kept.iter_mut() {
        note.length = min_length;
    }
    kept.sort_by_key(|note| note.note_type.as_u32());
}

/// Disco and disco-noflip cannot coexist; disco wins.
fn normalize_disco(bits: NoteFlags) -> NoteFlags {
    if bits.contains(NoteFlags::DISCO) {
        NoteFlags::DISCO
    } else {
        bits & NoteFlags::DISCO_NOFLIP
    }
}
