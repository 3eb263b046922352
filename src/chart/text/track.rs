//! Instrument/difficulty section readers for `.chart`.

use crate::chart::model::raw::{RawEvent, RawEventKind, RawTrack};
use crate::chart::model::track::{Difficulty, Instrument, InstrumentType};

use super::scanner::SectionText;

/// Maps a section name like `ExpertSingle` to its track identity.
pub(crate) fn section_track_name(name: &str) -> Option<(Instrument, Difficulty)> {
    const DIFFICULTIES: [(&str, Difficulty); 4] = [
        ("Expert", Difficulty::Expert),
        ("Hard", Difficulty::Hard),
        ("Medium", Difficulty::Medium),
        ("Easy", Difficulty::Easy),
    ];
    const INSTRUMENTS: [(&str, Instrument); 10] = [
        ("Single", Instrument::Guitar),
        ("DoubleGuitar", Instrument::GuitarCoop),
        ("DoubleRhythm", Instrument::Rhythm),
        ("DoubleBass", Instrument::Bass),
        ("Drums", Instrument::Drums),
        ("Keyboard", Instrument::Keys),
        ("GHLGuitar", Instrument::GuitarGhl),
        ("GHLCoop", Instrument::GuitarCoopGhl),
        ("GHLRhythm", Instrument::RhythmGhl),
        ("GHLBass", Instrument::BassGhl),
    ];
    let (rest, difficulty) = DIFFICULTIES
        .iter()
        .find_map(|&(prefix, difficulty)| name.strip_prefix(prefix).map(|rest| (rest, difficulty)))?;
    let (_, instrument) = INSTRUMENTS
        .iter()
        .find(|&&(suffix, _)| suffix == rest)?;
    Some((*instrument, difficulty))
}

pub(crate) fn read_track(
    section: &SectionText<'_>,
    instrument: Instrument,
    difficulty: Difficulty,
) -> RawTrack {
    let instrument_type = instrument.instrument_type();
    let mut events = Vec::with_capacity(section.lines.len());
    for &(key, value) in &section.lines {
        let Ok(tick) = key.parse::<i64>() else {
            continue;
        };
        if tick < 0 {
            continue;
        }
        let mut words = value.split_ascii_whitespace();
        match words.next() {
            Some("N") => {
                let Some(lane) = words.next().and_then(|word| word.parse::<u32>().ok()) else {
                    continue;
                };
                let length = words
                    .next()
                    .and_then(|word| word.parse::<i64>().ok())
                    .unwrap_or(0);
                if let Some(kind) = note_kind(instrument_type, lane) {
                    events.push(RawEvent::new(tick, length.max(0), kind));
                }
            }
            Some("S") => {
                let Some(kind) = words.next().and_then(|word| word.parse::<u32>().ok()) else {
                    continue;
                };
                let length = words
                    .next()
                    .and_then(|word| word.parse::<i64>().ok())
                    .unwrap_or(0);
                let kind = match kind {
                    2 => RawEventKind::StarPower,
                    64 => RawEventKind::DrumFreestyle,
                    65 => RawEventKind::FlexLaneSingle,
                    66 => RawEventKind::FlexLaneDouble,
                    _ => continue,
                };
                events.push(RawEvent::new(tick, length.max(0), kind));
            }
            Some("E") => match words.next() {
                Some("solo") => events.push(RawEvent::new(tick, 0, RawEventKind::SoloStart)),
                Some("soloend") => events.push(RawEvent::new(tick, 0, RawEventKind::SoloEnd)),
                _ => {}
            },
            _ => {}
        }
    }
    events.sort_by_key(|event| event.tick);
    merge_solo_markers(&mut events);
    RawTrack {
        instrument,
        difficulty,
        dynamics: false,
        events,
    }
}

/// Decodes an `N <lane>` value for the given instrument family.
fn note_kind(instrument_type: InstrumentType, lane: u32) -> Option<RawEventKind> {
    use RawEventKind::*;
    let kind = match instrument_type {
        InstrumentType::FiveFret => match lane {
            0 => Green,
            1 => Red,
            2 => Yellow,
            3 => Blue,
            4 => Orange,
            5 => ForceUnnatural,
            6 => ForceTap,
            7 => Open,
            _ => return None,
        },
        InstrumentType::SixFret => match lane {
            0 => White1,
            1 => White2,
            2 => White3,
            3 => Black1,
            4 => Black2,
            5 => ForceUnnatural,
            6 => ForceTap,
            7 => Open,
            8 => Black3,
            _ => return None,
        },
        InstrumentType::Drums => match lane {
            0 => Kick,
            1 => RedDrum,
            2 => YellowDrum,
            3 => BlueDrum,
            4 => FourLaneGreen,
            5 => FiveLaneGreen,
            32 => DoubleKick,
            34 => AccentRed,
            35 => AccentYellow,
            36 => AccentBlue,
            37 => AccentFourLaneGreen,
            38 => AccentFiveLaneGreen,
            40 => GhostRed,
            41 => GhostYellow,
            42 => GhostBlue,
            43 => GhostFourLaneGreen,
            44 => GhostFiveLaneGreen,
            66 => YellowCymbalMarker,
            67 => BlueCymbalMarker,
            68 => GreenCymbalMarker,
            _ => return None,
        },
    };
    Some(kind)
}

/// Replaces paired `E solo` / `E soloend` markers with a single solo phrase.
///
/// The `.chart` convention includes the final tick, so the merged length is
/// `end − start + 1`.
fn merge_solo_markers(events: &mut Vec<RawEvent>) {
    let mut merged = Vec::with_capacity(events.len());
    let mut solo_start: Option<i64> = None;
    for event in events.drain(..) {
        match event.kind {
            RawEventKind::SoloStart => {
                if solo_start.is_none() {
                    solo_start = Some(event.tick);
                }
            }
            RawEventKind::SoloEnd => {
                if let Some(start) = solo_start.take() {
                    merged.push(RawEvent::new(
                        start,
                        event.tick - start + 1,
                        RawEventKind::Solo,
                    ));
                }
            }
            _ => merged.push(event),
        }
    }
    // An unmatched solo start is discarded.
    merged.sort_by_key(|event| event.tick);
    *events = merged;
}
