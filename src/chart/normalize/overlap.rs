//! Overlap repair for notes and phrases.
//!
//! After this pass no two same-type notes overlap in the half-open
//! `[tick, tick + length)` sense, and neither do two phrases of one table.
//! Total covered time never shrinks: a truncated sustain's remainder is
//! pushed onto the following note or phrase.

use std::collections::HashMap;

use crate::chart::model::note::NoteType;

use super::ProtoNote;

/// Deduplicates within groups and truncates sustains that run into the next
/// note of the same type.
pub(super) fn repair_notes(groups: &mut Vec<Vec<ProtoNote>>) {
    // Within a group: same-type duplicates keep the longest length, then
    // the highest flag bits.
    for group in groups.iter_mut() {
        group.sort_by(|a, b| {
            (a.note_type.as_u32())
                .cmp(&b.note_type.as_u32())
                .then(b.length.cmp(&a.length))
                .then(b.flags.bits().cmp(&a.flags.bits()))
        });
        group.dedup_by_key(|note| note.note_type);
    }
    groups.retain(|group| !group.is_empty());

    // Across groups: per type, truncate the earlier sustain at the next
    // note's start and extend the later note to cover the remainder.
    let mut last_of_type: HashMap<NoteType, (usize, usize)> = HashMap::new();
    for group_index in 0..groups.len() {
        for note_index in 0..groups[group_index].len() {
            let current = groups[group_index][note_index];
            if let Some(&(prev_group, prev_note)) = last_of_type.get(&current.note_type) {
                let previous = groups[prev_group][prev_note];
                let previous_end = previous.tick + previous.length;
                if previous_end > current.tick {
                    groups[prev_group][prev_note].length = current.tick - previous.tick;
                    let current_end = current.tick + current.length;
                    if previous_end > current_end {
                        groups[group_index][note_index].length = previous_end - current.tick;
                    }
                }
            }
            last_of_type.insert(current.note_type, (group_index, note_index));
        }
    }
}

/// A phrase mid-normalization, carrying its table-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProtoPhrase<T> {
    pub(crate) tick: i64,
    pub(crate) length: i64,
    pub(crate) data: T,
}

impl<T> ProtoPhrase<T> {
    pub(crate) const fn new(tick: i64, length: i64, data: T) -> Self {
        Self { tick, length, data }
    }
}

/// Sorts a phrase table, drops same-tick duplicates keeping the longest,
/// and resolves adjacent overlap by truncating the earlier phrase and
/// extending the later one.
pub(super) fn repair_phrases<T: Copy>(phrases: &mut Vec<ProtoPhrase<T>>) {
    phrases.sort_by_key(|phrase| phrase.tick);

    let mut kept: Vec<ProtoPhrase<T>> = Vec::with_capacity(phrases.len());
    for phrase in phrases.drain(..) {
        match kept.last_mut() {
            Some(last) if last.tick == phrase.tick => {
                if phrase.length > last.length {
                    *last = phrase;
                }
            }
            _ => kept.push(phrase),
        }
    }

    for index in 1..kept.len() {
        let previous = kept[index - 1];
        let previous_end = previous.tick + previous.length;
        let current = kept[index];
        if previous_end > current.tick {
            kept[index - 1].length = current.tick - previous.tick;
            let current_end = current.tick + current.length;
            if previous_end > current_end {
                kept[index].length = previous_end - current.tick;
            }
        }
    }
    *phrases = kept;
}
