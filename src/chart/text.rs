//! The raw `.chart` parser.
//!
//! Decoded text == [`scanner`] ==> bracketed sections == [`parse`] ==>
//! [`RawChart`]
//!
//! The scanner only understands the bracket/brace structure; the per-section
//! readers here interpret `[Song]`, `[SyncTrack]`, `[Events]` and the
//! instrument/difficulty sections. The reference game is tolerant of noise,
//! so unrecognized sections and malformed body lines are skipped; only the
//! structural failures of the format abort the parse.

mod events;
mod scanner;
mod track;

use thiserror::Error;

use super::model::raw::{RawChart, RawEvent, RawSection, RawTempo, RawTimeSignature, RawTrack};
use super::model::track::Difficulty;
use self::scanner::SectionText;

pub(crate) use self::events::{parse_global_event, GlobalEvent};
pub(crate) use self::track::section_track_name;

/// A fatal structural error in a `.chart` source.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextParseError {
    /// The source contained no sections at all.
    #[error("no sections found")]
    NoSections,
    /// A `[` section name ran into the end of its line.
    #[error("unterminated section name")]
    UnterminatedSectionName,
    /// `[Song]` is missing a positive `Resolution`.
    #[error("missing or invalid Resolution in [Song]")]
    MissingResolution,
    /// A tempo marker declared zero beats per minute.
    #[error("tempo marker at tick {tick} has zero BPM")]
    ZeroTempo {
        /// The offending marker's tick.
        tick: i64,
    },
    /// A time signature declared a zero numerator or denominator.
    #[error("time signature at tick {tick} has a zero component")]
    ZeroTimeSignature {
        /// The offending marker's tick.
        tick: i64,
    },
}

/// Parses decoded `.chart` text into the raw model.
pub fn parse(source: &str) -> Result<RawChart, TextParseError> {
    let sections = scanner::scan(source)?;
    if sections.is_empty() {
        return Err(TextParseError::NoSections);
    }

    let mut metadata = Vec::new();
    let mut tempos = Vec::new();
    let mut time_signatures = Vec::new();
    let mut named_sections = Vec::new();
    let mut end_events = Vec::new();
    let mut coda_tick = None;
    let mut has_vocals = false;
    let mut tracks: Vec<RawTrack> = Vec::new();
    // Disco-flip events live in [Events] but belong to a drums difficulty;
    // they are routed after every section has been read.
    let mut disco_events: Vec<(Difficulty, RawEvent)> = Vec::new();

    for section in &sections {
        match section.name {
            "Song" => read_song(section, &mut metadata),
            "SyncTrack" => read_sync_track(section, &mut tempos, &mut time_signatures)?,
            "Events" => read_events(
                section,
                &mut named_sections,
                &mut end_events,
                &mut coda_tick,
                &mut has_vocals,
                &mut disco_events,
            ),
            name => {
                if let Some((instrument, difficulty)) = section_track_name(name) {
                    tracks.push(track::read_track(section, instrument, difficulty));
                } else {
                    log::debug!("skipping unrecognized section [{name}]");
                }
            }
        }
    }

    let resolution = metadata
        .iter()
        .find(|(key, _)| key == "Resolution")
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .filter(|&resolution| resolution > 0)
        .ok_or(TextParseError::MissingResolution)?;

    for (difficulty, event) in disco_events {
        if let Some(track) = tracks.iter_mut().find(|track| {
            track.instrument == super::model::track::Instrument::Drums
                && track.difficulty == difficulty
        }) {
            track.events.push(event);
        }
    }
    for track in &mut tracks {
        track.events.sort_by_key(|event| event.tick);
    }

    Ok(RawChart {
        resolution,
        metadata,
        tempos,
        time_signatures,
        sections: named_sections,
        end_events,
        coda_tick,
        has_vocals,
        tracks,
    })
}

fn read_song(section: &SectionText<'_>, metadata: &mut Vec<(String, String)>) {
    for &(key, value) in &section.lines {
        let value = value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(value);
        metadata.push((key.to_owned(), value.to_owned()));
    }
}

fn read_sync_track(
    section: &SectionText<'_>,
    tempos: &mut Vec<RawTempo>,
    time_signatures: &mut Vec<RawTimeSignature>,
) -> Result<(), TextParseError> {
    for &(key, value) in &section.lines {
        let Ok(tick) = key.parse::<i64>() else {
            continue;
        };
        if tick < 0 {
            continue;
        }
        let mut words = value.split_ascii_whitespace();
        match words.next() {
            Some("B") => {
                let Some(millibpm) = words.next().and_then(|word| word.parse::<i64>().ok()) else {
                    continue;
                };
                if millibpm == 0 {
                    return Err(TextParseError::ZeroTempo { tick });
                }
                tempos.push(RawTempo {
                    tick,
                    bpm: millibpm as f64 / 1000.0,
                });
            }
            Some("TS") => {
                let Some(numerator) = words.next().and_then(|word| word.parse::<u32>().ok())
                else {
                    continue;
                };
                let denominator = match words.next() {
                    Some(word) => match word.parse::<u32>() {
                        Ok(exponent) if exponent < 32 => 1u32 << exponent,
                        _ => return Err(TextParseError::ZeroTimeSignature { tick }),
                    },
                    None => 4,
                };
                if numerator == 0 {
                    return Err(TextParseError::ZeroTimeSignature { tick });
                }
                time_signatures.push(RawTimeSignature {
                    tick,
                    numerator,
                    denominator,
                });
            }
            _ => {}
        }
    }
    // Markers may be charted out of order; the timing engine needs them
    // monotonic.
    tempos.sort_by_key(|tempo| tempo.tick);
    time_signatures.sort_by_key(|ts| ts.tick);
    Ok(())
}

fn read_events(
    section: &SectionText<'_>,
    named_sections: &mut Vec<RawSection>,
    end_events: &mut Vec<i64>,
    coda_tick: &mut Option<i64>,
    has_vocals: &mut bool,
    disco_events: &mut Vec<(Difficulty, RawEvent)>,
) {
    for &(key, value) in &section.lines {
        let Ok(tick) = key.parse::<i64>() else {
            continue;
        };
        if tick < 0 {
            continue;
        }
        let Some(text) = value.strip_prefix('E') else {
            continue;
        };
        let text = text.trim();
        let text = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(text);
        match parse_global_event(text) {
            GlobalEvent::Section(name) => named_sections.push(RawSection {
                tick,
                name: name.to_owned(),
            }),
            GlobalEvent::End => end_events.push(tick),
            GlobalEvent::Coda => {
                if coda_tick.is_none() {
                    *coda_tick = Some(tick);
                }
            }
            GlobalEvent::Lyric => *has_vocals = true,
            GlobalEvent::DiscoFlip { difficulty, state } => {
                disco_events.push((difficulty, RawEvent::new(tick, 0, state)));
            }
            GlobalEvent::Ignored | GlobalEvent::Other => {}
        }
    }
    end_events.sort_unstable();
}
