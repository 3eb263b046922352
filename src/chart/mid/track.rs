//! Lowering of one `.mid` instrument track into per-difficulty raw tracks.

use std::collections::HashMap;

use midly::{MetaMessage, MidiMessage, TrackEvent, TrackEventKind};

use crate::chart::model::raw::{RawEvent, RawEventKind, RawTrack};
use crate::chart::model::track::{Difficulty, Instrument, InstrumentType};
use crate::chart::text::GlobalEvent;

use super::names::{flex_lane_applies, map_note, sysex_difficulty, Mapped};
use super::strip_brackets;

const PHASE_SHIFT_HEADER: [u8; 4] = [0x50, 0x53, 0x00, 0x00];
const PS_OPEN_FORCE: u8 = 0x01;
const PS_TAP_FORCE: u8 = 0x04;

/// Lowers a recognized instrument track into one raw track per charted
/// difficulty. A difficulty with no playable notes is cleared entirely, so
/// no stray modifiers survive.
pub(crate) fn lower_instrument_track(
    events: &[TrackEvent<'_>],
    instrument: Instrument,
) -> Vec<RawTrack> {
    let instrument_type = instrument.instrument_type();

    // Text toggles gate interpretation wherever they appear in the track,
    // so they are resolved before the event walk.
    let mut enhanced_opens = false;
    let mut dynamics = false;
    for event in events {
        if let TrackEventKind::Meta(MetaMessage::Text(text)) = event.kind {
            match strip_brackets(String::from_utf8_lossy(text).trim()) {
                "ENHANCED_OPENS" => enhanced_opens = true,
                "ENABLE_CHART_DYNAMICS" => dynamics = true,
                _ => {}
            }
        }
    }

    let mut per_diff: [Vec<RawEvent>; 4] = Default::default();
    let mut wide: Vec<RawEvent> = Vec::new();
    // Open note-ons, keyed by pitch and channel: a note-off pairs with the
    // most recent note-on of its pitch on its own channel.
    let mut active: HashMap<(u8, u8), Vec<(i64, u8)>> = HashMap::new();
    let mut sysex_active: HashMap<(u8, u8), i64> = HashMap::new();
    let mut sysex_events: Vec<(Option<Difficulty>, RawEvent)> = Vec::new();

    let mut tick = 0i64;
    for event in events {
        tick += i64::from(event.delta.as_int());
        match event.kind {
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        active
                            .entry((key.as_int(), channel))
                            .or_default()
                            .push((tick, vel.as_int()));
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let Some((start, velocity)) = active
                            .get_mut(&(key.as_int(), channel))
                            .and_then(Vec::pop)
                        else {
                            continue;
                        };
                        let completed = RawEvent {
                            tick: start,
                            length: tick - start,
                            kind: RawEventKind::Open, // placeholder, mapped below
                            velocity,
                            channel,
                        };
                        match map_note(instrument_type, key.as_int(), enhanced_opens) {
                            Some(Mapped::Note { difficulty, kind }) => {
                                per_diff[diff_index(difficulty)]
                                    .push(RawEvent { kind, ..completed });
                            }
                            Some(Mapped::Wide { kind }) => {
                                wide.push(RawEvent { kind, ..completed });
                            }
                            None => {}
                        }
                    }
                    _ => {}
                }
            }
            TrackEventKind::Meta(MetaMessage::Text(text)) => {
                let text = String::from_utf8_lossy(text);
                if let GlobalEvent::DiscoFlip { difficulty, state } =
                    crate::chart::text::parse_global_event(strip_brackets(text.trim()))
                {
                    per_diff[diff_index(difficulty)].push(RawEvent::new(tick, 0, state));
                }
            }
            TrackEventKind::SysEx(data) => {
                handle_sysex(data, tick, &mut sysex_active, &mut sysex_events);
            }
            _ => {}
        }
    }
    // Unmatched note-ons (and unmatched sysex "on" states) are discarded.

    let charted: Vec<bool> = per_diff
        .iter()
        .map(|events| {
            events
                .iter()
                .any(|event| event.kind.is_playable_note(instrument_type))
        })
        .collect();

    for (target, event) in sysex_events {
        match target {
            Some(difficulty) => per_diff[diff_index(difficulty)].push(event),
            None => {
                for (index, bucket) in per_diff.iter_mut().enumerate() {
                    if charted[index] {
                        bucket.push(event);
                    }
                }
            }
        }
    }

    for (index, bucket) in per_diff.iter_mut().enumerate() {
        if !charted[index] {
            continue;
        }
        let difficulty = Difficulty::ALL[index];
        for event in &wide {
            let is_flex = matches!(
                event.kind,
                RawEventKind::FlexLaneSingle | RawEventKind::FlexLaneDouble
            );
            if is_flex && !flex_lane_applies(difficulty, event.velocity) {
                continue;
            }
            bucket.push(*event);
        }
    }

    let mut tracks = Vec::new();
    for (index, mut bucket) in per_diff.into_iter().enumerate() {
        if !charted[index] {
            continue;
        }
        bucket.sort_by_key(|event| event.tick);
        split_sustained_modifiers(&mut bucket, instrument_type);
        tracks.push(RawTrack {
            instrument,
            difficulty: Difficulty::ALL[index],
            dynamics,
            events: bucket,
        });
    }
    tracks
}

const fn diff_index(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Expert => 0,
        Difficulty::Hard => 1,
        Difficulty::Medium => 2,
        Difficulty::Easy => 3,
    }
}

/// Decodes a Phase-Shift SysEx payload `50 53 00 00 <diff> <type> <on>`.
fn handle_sysex(
    data: &[u8],
    tick: i64,
    sysex_active: &mut HashMap<(u8, u8), i64>,
    sysex_events: &mut Vec<(Option<Difficulty>, RawEvent)>,
) {
    let data = data.strip_prefix(&[0xF0]).unwrap_or(data);
    if data.len() < 7 || data[..4] != PHASE_SHIFT_HEADER {
        return;
    }
    let (diff_byte, code, on) = (data[4], data[5], data[6] != 0);
    let kind = match code {
        PS_OPEN_FORCE => RawEventKind::ForceOpen,
        PS_TAP_FORCE => RawEventKind::ForceTap,
        _ => return,
    };
    if on {
        sysex_active.entry((diff_byte, code)).or_insert(tick);
    } else if let Some(start) = sysex_active.remove(&(diff_byte, code)) {
        if let Some(target) = sysex_difficulty(diff_byte) {
            sysex_events.push((target, RawEvent::new(start, tick - start, kind)));
        }
    }
}

/// Splits every sustained modifier region into zero-length copies at each
/// playable-note tick inside its half-open `[start, end)` range, matching
/// the `.chart` convention the normalizer expects.
fn split_sustained_modifiers(events: &mut Vec<RawEvent>, instrument_type: InstrumentType) {
    let mut note_ticks: Vec<i64> = events
        .iter()
        .filter(|event| event.kind.is_playable_note(instrument_type))
        .map(|event| event.tick)
        .collect();
    note_ticks.dedup();

    let mut out = Vec::with_capacity(events.len());
    for event in events.drain(..) {
        if !event.kind.is_sustained_modifier() {
            out.push(event);
            continue;
        }
        let start = note_ticks.partition_point(|&t| t < event.tick);
        let end = note_ticks.partition_point(|&t| t < event.tick + event.length);
        for &note_tick in &note_ticks[start..end] {
            out.push(RawEvent {
                tick: note_tick,
                length: 0,
                ..event
            });
        }
    }
    out.sort_by_key(|event| event.tick);
    *events = out;
}
