//! The raw `.mid` parser.
//!
//! SMF bytes == [`midly`] ==> tracks of delta-timed events == [`parse`] ==>
//! [`RawChart`]
//!
//! `midly` handles the SMF container; everything chart-specific happens
//! here: recognizing track names, converting delta times to absolute ticks,
//! bucketing note numbers into difficulty ranges, channel-aware note
//! pairing, Phase-Shift SysEx decoding, and splitting sustained modifier
//! regions into the per-note convention the `.chart` format uses.

mod names;
mod track;

use midly::{Format, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;

use super::model::raw::{RawChart, RawSection, RawTempo, RawTimeSignature};
use super::text::{parse_global_event, GlobalEvent};
use self::names::TrackKind;

/// A fatal error from decoding a `.mid` chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidParseError {
    /// The bytes are not a well-formed Standard MIDI File.
    #[error("not a Standard MIDI File: {0}")]
    Smf(String),
    /// Only format 1 (parallel tracks, shared tempo track) is supported.
    #[error("unsupported SMF format {format}")]
    UnsupportedFormat {
        /// The header's format number.
        format: u16,
    },
    /// SMPTE timing has no tick resolution to map onto.
    #[error("SMPTE timing is not supported")]
    SmpteTiming,
    /// The file declared zero tracks.
    #[error("the file contains no tracks")]
    NoTracks,
}

/// Parses SMF bytes into the raw model.
pub fn parse(bytes: &[u8]) -> Result<RawChart, MidParseError> {
    let smf = Smf::parse(bytes).map_err(|error| MidParseError::Smf(error.to_string()))?;

    match smf.header.format {
        Format::Parallel => {}
        Format::SingleTrack => return Err(MidParseError::UnsupportedFormat { format: 0 }),
        Format::Sequential => return Err(MidParseError::UnsupportedFormat { format: 2 }),
    }
    let resolution = match smf.header.timing {
        Timing::Metrical(ticks_per_beat) => i64::from(ticks_per_beat.as_int()),
        Timing::Timecode(..) => return Err(MidParseError::SmpteTiming),
    };
    if smf.tracks.is_empty() {
        return Err(MidParseError::NoTracks);
    }

    let (tempos, time_signatures) = read_tempo_track(&smf.tracks[0]);

    let mut sections = Vec::new();
    let mut end_events = Vec::new();
    let mut coda_tick = None;
    let mut has_vocals = false;
    let mut tracks = Vec::new();

    for events in &smf.tracks {
        match names::recognize(track_name(events).as_deref()) {
            Some(TrackKind::Events) => read_events_track(
                events,
                &mut sections,
                &mut end_events,
                &mut coda_tick,
            ),
            Some(TrackKind::Vocals) => has_vocals = true,
            Some(TrackKind::Instrument(instrument)) => {
                tracks.extend(track::lower_instrument_track(events, instrument));
            }
            None => {}
        }
    }
    end_events.sort_unstable();

    Ok(RawChart {
        resolution,
        metadata: Vec::new(),
        tempos,
        time_signatures,
        sections,
        end_events,
        coda_tick,
        has_vocals,
        tracks,
    })
}

/// The track's name, taken only from a meta-event at delta time 0.
fn track_name(events: &[TrackEvent<'_>]) -> Option<String> {
    let mut tick = 0i64;
    for event in events {
        tick += i64::from(event.delta.as_int());
        if tick > 0 {
            break;
        }
        if let TrackEventKind::Meta(MetaMessage::TrackName(name)) = event.kind {
            return Some(String::from_utf8_lossy(name).trim().to_uppercase());
        }
    }
    None
}

/// Reads tempo and time-signature meta-events from track 0.
fn read_tempo_track(events: &[TrackEvent<'_>]) -> (Vec<RawTempo>, Vec<RawTimeSignature>) {
    let mut tempos = Vec::new();
    let mut time_signatures = Vec::new();
    let mut tick = 0i64;
    for event in events {
        tick += i64::from(event.delta.as_int());
        match event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat)) => {
                let us_per_beat = us_per_beat.as_int();
                if us_per_beat == 0 {
                    log::warn!("tempo meta with zero µs/beat at tick {tick}; skipped");
                    continue;
                }
                // The reference behavior is plain IEEE-754 division; the BPM
                // representation lands in the hash preimage as-is.
                tempos.push(RawTempo {
                    tick,
                    bpm: 60_000_000.0 / f64::from(us_per_beat),
                });
            }
            TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, denom_power, _, _)) => {
                if numerator == 0 || denom_power >= 32 {
                    log::warn!("degenerate time signature meta at tick {tick}; skipped");
                    continue;
                }
                time_signatures.push(RawTimeSignature {
                    tick,
                    numerator: u32::from(numerator),
                    denominator: 1u32 << denom_power,
                });
            }
            _ => {}
        }
    }
    tempos.sort_by_key(|tempo| tempo.tick);
    time_signatures.sort_by_key(|ts| ts.tick);
    (tempos, time_signatures)
}

/// Reads the `EVENTS` track: sections, `end` and `coda` markers.
fn read_events_track(
    events: &[TrackEvent<'_>],
    sections: &mut Vec<RawSection>,
    end_events: &mut Vec<i64>,
    coda_tick: &mut Option<i64>,
) {
    let mut tick = 0i64;
    for event in events {
        tick += i64::from(event.delta.as_int());
        let TrackEventKind::Meta(MetaMessage::Text(text)) = event.kind else {
            continue;
        };
        let text = String::from_utf8_lossy(text);
        match parse_global_event(strip_brackets(text.trim())) {
            GlobalEvent::Section(name) => sections.push(RawSection {
                tick,
                name: name.to_owned(),
            }),
            GlobalEvent::End => end_events.push(tick),
            GlobalEvent::Coda => {
                if coda_tick.is_none() {
                    *coda_tick = Some(tick);
                }
            }
            _ => {}
        }
    }
}

/// `.mid` text events conventionally come wrapped in square brackets.
pub(crate) fn strip_brackets(text: &str) -> &str {
    text.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(text)
}
