//! The per-track normalizer: from raw events to the final, fully-timed
//! model.
//!
//! Raw parsers leave gameplay semantics uninterpreted; everything the
//! reference game decides at load time happens here, in order: sustain
//! cutoff, drum kit inference, drum and fret modifier resolution, natural
//! HOPO inference, chord snapping, overlap repair, phrase repair, legacy
//! Star-Power recovery, and the final tick→millisecond conversion.
//!
//! The passes are deliberately plain index loops with small per-type state
//! (the active disco register, the previous note group): the modifier rules
//! depend on lookback and in-place repair in ways iterator chains obscure.

mod drums;
mod frets;
mod overlap;
mod snap;

use itertools::Itertools;

use super::model::ini::IniChartModifiers;
use super::model::marker::{EndEvent, Section, TempoMarker, TimeSignature};
use super::model::note::{NoteEvent, NoteFlags, NoteType};
use super::model::phrase::{FlexLane, FreestyleSection, Phrase};
use super::model::raw::{RawChart, RawEvent, RawEventKind, RawTempo, RawTimeSignature, RawTrack};
use super::model::track::{DrumType, Instrument, InstrumentType};
use super::model::{ParsedChart, ParsedTrack};
use super::timing::{round_ms, TempoMap};
use super::ChartFormat;

pub(crate) use self::overlap::ProtoPhrase;

/// A note mid-normalization: resolved color and flags, no times yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProtoNote {
    pub(crate) tick: i64,
    pub(crate) length: i64,
    pub(crate) note_type: NoteType,
    pub(crate) flags: NoteFlags,
}

/// Runs the whole normalization pipeline over a raw chart.
pub(crate) fn normalize(
    mut raw: RawChart,
    format: ChartFormat,
    mods: &IniChartModifiers,
) -> ParsedChart {
    // Tick 0 is always anchored, synthesizing the defaults if the chart
    // never declares them.
    if raw.tempos.first().is_none_or(|tempo| tempo.tick != 0) {
        raw.tempos.insert(0, RawTempo { tick: 0, bpm: 120.0 });
    }
    if raw.time_signatures.first().is_none_or(|ts| ts.tick != 0) {
        raw.time_signatures.insert(
            0,
            RawTimeSignature {
                tick: 0,
                numerator: 4,
                denominator: 4,
            },
        );
    }
    let tempo_map = TempoMap::new(&raw.tempos, raw.resolution);
    let drum_type = infer_drum_type(&raw, mods);

    let tracks = raw
        .tracks
        .iter()
        .map(|track| {
            normalize_track(
                track,
                format,
                mods,
                raw.resolution,
                drum_type,
                raw.coda_tick,
                &tempo_map,
            )
        })
        .collect();

    ParsedChart {
        resolution: raw.resolution,
        format,
        metadata: raw.metadata,
        tempos: raw
            .tempos
            .iter()
            .map(|tempo| TempoMarker {
                tick: tempo.tick,
                bpm: tempo.bpm,
                ms_time: round_ms(tempo_map.ms_at(tempo.tick)),
            })
            .collect(),
        time_signatures: raw
            .time_signatures
            .iter()
            .map(|ts| TimeSignature {
                tick: ts.tick,
                numerator: ts.numerator,
                denominator: ts.denominator,
                ms_time: round_ms(tempo_map.ms_at(ts.tick)),
            })
            .collect(),
        sections: raw
            .sections
            .iter()
            .map(|section| Section {
                tick: section.tick,
                name: section.name.clone(),
                ms_time: round_ms(tempo_map.ms_at(section.tick)),
            })
            .collect(),
        end_events: raw
            .end_events
            .iter()
            .map(|&tick| EndEvent {
                tick,
                ms_time: round_ms(tempo_map.ms_at(tick)),
            })
            .collect(),
        drum_type,
        has_vocals: raw.has_vocals,
        tracks,
    }
}

/// Infers the drum kit layout of the whole chart.
fn infer_drum_type(raw: &RawChart, mods: &IniChartModifiers) -> Option<DrumType> {
    let mut drum_tracks = raw
        .tracks
        .iter()
        .filter(|track| track.instrument == Instrument::Drums)
        .peekable();
    drum_tracks.peek()?;

    if mods.pro_drums {
        return Some(DrumType::FourLanePro);
    }
    if mods.five_lane_drums {
        return Some(DrumType::FiveLane);
    }
    let mut saw_five_green = false;
    for track in drum_tracks {
        for event in &track.events {
            match event.kind {
                RawEventKind::YellowTomMarker
                | RawEventKind::BlueTomMarker
                | RawEventKind::GreenTomMarker
                | RawEventKind::YellowCymbalMarker
                | RawEventKind::BlueCymbalMarker
                | RawEventKind::GreenCymbalMarker => return Some(DrumType::FourLanePro),
                RawEventKind::FiveLaneGreen => saw_five_green = true,
                _ => {}
            }
        }
    }
    Some(if saw_five_green {
        DrumType::FiveLane
    } else {
        DrumType::FourLane
    })
}

#[allow(clippy::too_many_arguments)]
fn normalize_track(
    track: &RawTrack,
    format: ChartFormat,
    mods: &IniChartModifiers,
    resolution: i64,
    drum_type: Option<DrumType>,
    coda_tick: Option<i64>,
    tempo_map: &TempoMap,
) -> ParsedTrack {
    let instrument_type = track.instrument.instrument_type();

    // Sustain cutoff runs before anything interprets lengths.
    let cutoff = mods.sustain_cutoff(resolution, format);
    let mut events = track.events.clone();
    for event in &mut events {
        if event.kind.is_playable_note(instrument_type) && event.length <= cutoff {
            event.length = 0;
        }
    }

    let groups: Vec<(i64, Vec<RawEvent>)> = events
        .iter()
        .chunk_by(|event| event.tick)
        .into_iter()
        .map(|(tick, chunk)| (tick, chunk.copied().collect()))
        .collect();

    let mut note_groups = match instrument_type {
        InstrumentType::Drums => drums::resolve(&groups, format, drum_type, track.dynamics),
        _ => frets::resolve(
            &groups,
            format,
            mods.hopo_threshold(resolution, format),
        ),
    };

    snap::snap_chords(
        &mut note_groups,
        mods.chord_snap_threshold,
        instrument_type,
    );
    overlap::repair_notes(&mut note_groups);

    // Phrase tables come straight from the raw events; snapping never moves
    // them.
    let mut star_power = extract_phrases(&events, RawEventKind::StarPower);
    let mut solos = extract_phrases(&events, RawEventKind::Solo);
    let mut rejected = Vec::new();

    if format == ChartFormat::Mid && instrument_type != InstrumentType::Drums {
        apply_legacy_star_power(mods, &mut star_power, &mut solos, &mut rejected);
    }

    let mut flex_lanes: Vec<ProtoPhrase<bool>> = events
        .iter()
        .filter_map(|event| match event.kind {
            RawEventKind::FlexLaneSingle => Some(ProtoPhrase::new(event.tick, event.length, false)),
            RawEventKind::FlexLaneDouble => Some(ProtoPhrase::new(event.tick, event.length, true)),
            _ => None,
        })
        .collect();
    let mut freestyle: Vec<ProtoPhrase<bool>> = events
        .iter()
        .filter(|event| event.kind == RawEventKind::DrumFreestyle)
        .map(|event| {
            let is_coda = coda_tick.is_some_and(|coda| event.tick >= coda);
            ProtoPhrase::new(event.tick, event.length, is_coda)
        })
        .collect();

    overlap::repair_phrases(&mut star_power);
    overlap::repair_phrases(&mut rejected);
    overlap::repair_phrases(&mut solos);
    overlap::repair_phrases(&mut flex_lanes);
    overlap::repair_phrases(&mut freestyle);

    ParsedTrack {
        instrument: track.instrument,
        difficulty: track.difficulty,
        note_event_groups: note_groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|note| NoteEvent {
                        tick: note.tick,
                        ms_time: round_ms(tempo_map.ms_at(note.tick)),
                        length: note.length,
                        ms_length: round_ms(tempo_map.ms_span(note.tick, note.length)),
                        note_type: note.note_type,
                        flags: note.flags,
                    })
                    .collect()
            })
            .collect(),
        star_power_sections: timed_phrases(&star_power, tempo_map),
        rejected_star_power_sections: timed_phrases(&rejected, tempo_map),
        solo_sections: timed_phrases(&solos, tempo_map),
        flex_lanes: flex_lanes
            .iter()
            .map(|lane| FlexLane {
                phrase: timed_phrase(lane.tick, lane.length, tempo_map),
                is_double: lane.data,
            })
            .collect(),
        drum_freestyle_sections: freestyle
            .iter()
            .map(|section| FreestyleSection {
                phrase: timed_phrase(section.tick, section.length, tempo_map),
                is_coda: section.data,
            })
            .collect(),
    }
}

/// The legacy GH1/GH2 Star-Power recovery: solos become Star Power and any
/// real Star-Power phrases are set aside as rejected.
fn apply_legacy_star_power(
    mods: &IniChartModifiers,
    star_power: &mut Vec<ProtoPhrase<()>>,
    solos: &mut Vec<ProtoPhrase<()>>,
    rejected: &mut Vec<ProtoPhrase<()>>,
) {
    let swap = mods.multiplier_note == 103
        || (mods.multiplier_note == 0 && star_power.is_empty() && solos.len() > 1);
    if !swap {
        return;
    }
    rejected.append(star_power);
    star_power.append(solos);
}

fn extract_phrases(events: &[RawEvent], kind: RawEventKind) -> Vec<ProtoPhrase<()>> {
    events
        .iter()
        .filter(|event| event.kind == kind)
        .map(|event| ProtoPhrase::new(event.tick, event.length, ()))
        .collect()
}

fn timed_phrase(tick: i64, length: i64, tempo_map: &TempoMap) -> Phrase {
    Phrase {
        tick,
        ms_time: round_ms(tempo_map.ms_at(tick)),
        length,
        ms_length: round_ms(tempo_map.ms_span(tick, length)),
    }
}

fn timed_phrases(phrases: &[ProtoPhrase<()>], tempo_map: &TempoMap) -> Vec<Phrase> {
    phrases
        .iter()
        .map(|phrase| timed_phrase(phrase.tick, phrase.length, tempo_map))
        .collect()
}
