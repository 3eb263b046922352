//! Drum modifier resolution: disco flips, toms and cymbals, dynamics.

use crate::chart::model::note::{NoteFlags, NoteType};
use crate::chart::model::raw::{RawEvent, RawEventKind};
use crate::chart::model::track::DrumType;
use crate::chart::ChartFormat;

use super::ProtoNote;

/// The active disco-flip register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscoState {
    Off,
    On,
    NoFlip,
}

/// Resolves one drum track's tick groups into proto notes.
pub(super) fn resolve(
    groups: &[(i64, Vec<RawEvent>)],
    format: ChartFormat,
    drum_type: Option<DrumType>,
    dynamics: bool,
) -> Vec<Vec<ProtoNote>> {
    let drum_type = drum_type.unwrap_or(DrumType::FourLane);
    let mut disco = DiscoState::Off;
    let mut out = Vec::new();

    for (tick, events) in groups {
        // The register updates first: it takes effect from this tick
        // forward, start-inclusive and end-exclusive.
        if let Some(kind) = events
            .iter()
            .map(|event| event.kind)
            .filter(|kind| kind.is_disco())
            .min()
        {
            disco = match kind {
                RawEventKind::DiscoFlipOn => DiscoState::On,
                RawEventKind::DiscoNoFlipOn => DiscoState::NoFlip,
                _ => DiscoState::Off,
            };
        }

        let flam = events
            .iter()
            .any(|event| event.kind == RawEventKind::ForceFlam);
        let has_four_green = events
            .iter()
            .any(|event| event.kind == RawEventKind::FourLaneGreen);
        let has_five_green = events
            .iter()
            .any(|event| event.kind == RawEventKind::FiveLaneGreen);

        let mut group = Vec::new();
        for event in events {
            if !event
                .kind
                .is_playable_note(crate::chart::model::track::InstrumentType::Drums)
            {
                continue;
            }
            let note_type = note_type(event.kind, has_four_green && has_five_green);
            let mut flags = NoteFlags::empty();
            if event.kind == RawEventKind::DoubleKick {
                flags |= NoteFlags::DOUBLE_KICK;
            }
            if flam {
                flags |= NoteFlags::FLAM;
            }
            if matches!(note_type, NoteType::RedDrum | NoteType::YellowDrum) {
                match disco {
                    DiscoState::On => flags |= NoteFlags::DISCO,
                    DiscoState::NoFlip => flags |= NoteFlags::DISCO_NOFLIP,
                    DiscoState::Off => {}
                }
            }
            if !event.kind.is_kick() {
                flags |= pad_surface(event.kind, format, drum_type, events);
                flags |= pad_dynamics(event, events, dynamics);
            }
            group.push(ProtoNote {
                tick: *tick,
                length: event.length,
                note_type,
                flags,
            });
        }
        if !group.is_empty() {
            out.push(group);
        }
    }
    out
}

/// Maps a raw drum lane onto its canonical pad color.
///
/// When lane 4 and lane 5 collide in one group, the five-lane green shifts
/// down to blue so both hits survive; otherwise both collapse onto green.
fn note_type(kind: RawEventKind, lanes_collide: bool) -> NoteType {
    match kind {
        RawEventKind::Kick | RawEventKind::DoubleKick => NoteType::Kick,
        RawEventKind::RedDrum => NoteType::RedDrum,
        RawEventKind::YellowDrum => NoteType::YellowDrum,
        RawEventKind::BlueDrum => NoteType::BlueDrum,
        RawEventKind::FiveLaneGreen if lanes_collide => NoteType::BlueDrum,
        _ => NoteType::GreenDrum,
    }
}

/// The tom/cymbal flag of a pad note.
fn pad_surface(
    kind: RawEventKind,
    format: ChartFormat,
    drum_type: DrumType,
    events: &[RawEvent],
) -> NoteFlags {
    match drum_type {
        DrumType::FourLane => NoteFlags::TOM,
        DrumType::FiveLane => match kind {
            // Charted lanes on a five-lane kit alternate tom and cymbal.
            RawEventKind::YellowDrum | RawEventKind::FourLaneGreen => NoteFlags::CYMBAL,
            _ => NoteFlags::TOM,
        },
        DrumType::FourLanePro => {
            let marker = match kind {
                RawEventKind::YellowDrum => Some((
                    RawEventKind::YellowTomMarker,
                    RawEventKind::YellowCymbalMarker,
                )),
                RawEventKind::BlueDrum => {
                    Some((RawEventKind::BlueTomMarker, RawEventKind::BlueCymbalMarker))
                }
                RawEventKind::FourLaneGreen | RawEventKind::FiveLaneGreen => {
                    Some((RawEventKind::GreenTomMarker, RawEventKind::GreenCymbalMarker))
                }
                _ => None,
            };
            let Some((tom_marker, cymbal_marker)) = marker else {
                // The red pad has no marker; it is always a tom.
                return NoteFlags::TOM;
            };
            let has = |wanted: RawEventKind| events.iter().any(|event| event.kind == wanted);
            match format {
                // `.mid` pro drums chart cymbals by default and mark toms.
                ChartFormat::Mid => {
                    if has(tom_marker) {
                        NoteFlags::TOM
                    } else {
                        NoteFlags::CYMBAL
                    }
                }
                // `.chart` inverts the sense: toms by default, cymbals marked.
                ChartFormat::Chart => {
                    if has(cymbal_marker) {
                        NoteFlags::CYMBAL
                    } else {
                        NoteFlags::TOM
                    }
                }
            }
        }
    }
}

/// Accent/ghost resolution: explicit markers first, then velocity dynamics.
fn pad_dynamics(event: &RawEvent, events: &[RawEvent], dynamics: bool) -> NoteFlags {
    let (accent_marker, ghost_marker) = match event.kind {
        RawEventKind::RedDrum => (RawEventKind::AccentRed, RawEventKind::GhostRed),
        RawEventKind::YellowDrum => (RawEventKind::AccentYellow, RawEventKind::GhostYellow),
        RawEventKind::BlueDrum => (RawEventKind::AccentBlue, RawEventKind::GhostBlue),
        RawEventKind::FourLaneGreen => (
            RawEventKind::AccentFourLaneGreen,
            RawEventKind::GhostFourLaneGreen,
        ),
        RawEventKind::FiveLaneGreen => (
            RawEventKind::AccentFiveLaneGreen,
            RawEventKind::GhostFiveLaneGreen,
        ),
        _ => return NoteFlags::empty(),
    };
    if events.iter().any(|other| other.kind == accent_marker) {
        return NoteFlags::ACCENT;
    }
    if events.iter().any(|other| other.kind == ghost_marker) {
        return NoteFlags::GHOST;
    }
    if dynamics {
        match event.velocity {
            127 => return NoteFlags::ACCENT,
            1 => return NoteFlags::GHOST,
            _ => {}
        }
    }
    NoteFlags::empty()
}
