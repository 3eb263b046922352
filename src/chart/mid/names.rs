//! Track-name and note-number tables for the `.mid` encoding.

use crate::chart::model::raw::RawEventKind;
use crate::chart::model::track::{Difficulty, Instrument, InstrumentType};

/// What a recognized track name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackKind {
    /// A playable instrument track.
    Instrument(Instrument),
    /// The global `EVENTS` track.
    Events,
    /// `PART VOCALS`; only its presence matters to the core.
    Vocals,
}

pub(crate) fn recognize(name: Option<&str>) -> Option<TrackKind> {
    let kind = match name? {
        // `T1 GEMS` is the GH1-era name for the lead guitar track.
        "T1 GEMS" | "PART GUITAR" => TrackKind::Instrument(Instrument::Guitar),
        "PART GUITAR COOP" => TrackKind::Instrument(Instrument::GuitarCoop),
        "PART RHYTHM" => TrackKind::Instrument(Instrument::Rhythm),
        "PART BASS" => TrackKind::Instrument(Instrument::Bass),
        "PART DRUMS" => TrackKind::Instrument(Instrument::Drums),
        "PART KEYS" => TrackKind::Instrument(Instrument::Keys),
        "PART GUITAR GHL" => TrackKind::Instrument(Instrument::GuitarGhl),
        "PART GUITAR COOP GHL" => TrackKind::Instrument(Instrument::GuitarCoopGhl),
        "PART RHYTHM GHL" => TrackKind::Instrument(Instrument::RhythmGhl),
        "PART BASS GHL" => TrackKind::Instrument(Instrument::BassGhl),
        "PART VOCALS" => TrackKind::Vocals,
        "EVENTS" => TrackKind::Events,
        _ => return None,
    };
    Some(kind)
}

/// Where a paired note event lands after range bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mapped {
    /// A per-difficulty event (playable note or ranged modifier).
    Note {
        difficulty: Difficulty,
        kind: RawEventKind,
    },
    /// An instrument-wide event, cloned into each charted difficulty.
    Wide { kind: RawEventKind },
}

/// Buckets a MIDI note number for the given instrument family.
///
/// `enhanced_opens` gates the 5-fret open slot (`base + 0`), which is only
/// meaningful after an `ENHANCED_OPENS` text event.
pub(crate) fn map_note(
    instrument_type: InstrumentType,
    pitch: u8,
    enhanced_opens: bool,
) -> Option<Mapped> {
    use RawEventKind::*;

    if let Some(kind) = wide_kind(pitch) {
        return Some(Mapped::Wide { kind });
    }

    match instrument_type {
        InstrumentType::FiveFret => {
            let (difficulty, offset) = bucket(pitch, &[(59, Difficulty::Easy), (71, Difficulty::Medium), (83, Difficulty::Hard), (95, Difficulty::Expert)], 0, 7)?;
            let kind = match offset {
                0 if enhanced_opens => Open,
                0 => return None,
                1 => Green,
                2 => Red,
                3 => Yellow,
                4 => Blue,
                5 => Orange,
                6 => ForceHopo,
                7 => ForceStrum,
                _ => return None,
            };
            Some(Mapped::Note { difficulty, kind })
        }
        InstrumentType::SixFret => {
            let (difficulty, offset) = bucket(pitch, &[(58, Difficulty::Easy), (70, Difficulty::Medium), (82, Difficulty::Hard), (94, Difficulty::Expert)], 0, 8)?;
            let kind = match offset {
                0 => Open,
                1 => White1,
                2 => White2,
                3 => White3,
                4 => Black1,
                5 => Black2,
                6 => Black3,
                7 => ForceHopo,
                8 => ForceStrum,
                _ => return None,
            };
            Some(Mapped::Note { difficulty, kind })
        }
        InstrumentType::Drums => {
            let (difficulty, offset) = bucket(pitch, &[(60, Difficulty::Easy), (72, Difficulty::Medium), (84, Difficulty::Hard), (96, Difficulty::Expert)], -1, 5)?;
            let kind = match offset {
                -1 => DoubleKick,
                0 => Kick,
                1 => RedDrum,
                2 => YellowDrum,
                3 => BlueDrum,
                4 => FourLaneGreen,
                5 => FiveLaneGreen,
                _ => return None,
            };
            Some(Mapped::Note { difficulty, kind })
        }
    }
}

/// The instrument-wide pitches 103–127.
fn wide_kind(pitch: u8) -> Option<RawEventKind> {
    use RawEventKind::*;
    let kind = match pitch {
        103 => Solo,
        104 => ForceTap,
        109 => ForceFlam,
        110 => YellowTomMarker,
        111 => BlueTomMarker,
        112 => GreenTomMarker,
        116 => StarPower,
        120 => DrumFreestyle,
        126 => FlexLaneDouble,
        127 => FlexLaneSingle,
        _ => return None,
    };
    Some(kind)
}

fn bucket(
    pitch: u8,
    bases: &[(i16, Difficulty); 4],
    low: i16,
    high: i16,
) -> Option<(Difficulty, i16)> {
    for &(base, difficulty) in bases {
        let offset = i16::from(pitch) - base;
        if (low..=high).contains(&offset) {
            return Some((difficulty, offset));
        }
    }
    None
}

/// Flex-lane velocity gating: whether a lane with this note-on velocity is
/// charted for the given difficulty.
pub(crate) fn flex_lane_applies(difficulty: Difficulty, velocity: u8) -> bool {
    match difficulty {
        Difficulty::Expert => true,
        Difficulty::Hard => (21..=50).contains(&velocity),
        Difficulty::Medium => (21..=40).contains(&velocity),
        Difficulty::Easy => (21..=30).contains(&velocity),
    }
}

/// The Phase-Shift SysEx difficulty byte; `0xFF` fans out to all.
pub(crate) fn sysex_difficulty(byte: u8) -> Option<Option<Difficulty>> {
    match byte {
        0 => Some(Some(Difficulty::Easy)),
        1 => Some(Some(Difficulty::Medium)),
        2 => Some(Some(Difficulty::Hard)),
        3 => Some(Some(Difficulty::Expert)),
        0xFF => Some(None),
        _ => None,
    }
}
