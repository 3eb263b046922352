//! The BTRACK serializer and track hasher.
//!
//! BTRACK is a frozen wire format: a big-endian `CHNF` magic, a
//! little-endian version and resolution, then seven count-prefixed record
//! sections in a fixed order. The note-type and flag numbers are part of
//! the hash preimage and must never be renumbered — the hash feeds
//! score-sensitive leaderboard identity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use thiserror::Error;

use super::model::phrase::Phrase;
use super::model::track::{Difficulty, Instrument};
use super::model::{ParsedChart, ParsedTrack};

/// The BTRACK magic, written big-endian: `CHNF`.
const MAGIC: [u8; 4] = [0x43, 0x48, 0x4E, 0x46];
/// The BTRACK layout version.
const VERSION: u32 = 20_240_320;

/// The result of hashing one track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackHash {
    /// base64url (unpadded) encoding of the 32-byte BLAKE3 digest.
    pub hash: String,
    /// The serialized BTRACK buffer the digest was computed over.
    pub bytes: Vec<u8>,
}

/// An error from [`hash_track`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashError {
    /// The requested instrument/difficulty combination is not charted.
    #[error("no {instrument} {difficulty} track in this chart")]
    TrackNotFound {
        /// The requested instrument.
        instrument: Instrument,
        /// The requested difficulty.
        difficulty: Difficulty,
    },
}

/// Serializes and hashes one track of a parsed chart.
///
/// The serialization is deterministic, so the hash is a pure function of
/// the normalized track content plus the chart's kept tempo and
/// time-signature markers.
pub fn hash_track(
    chart: &ParsedChart,
    instrument: Instrument,
    difficulty: Difficulty,
) -> Result<TrackHash, HashError> {
    let track = chart
        .track(instrument, difficulty)
        .ok_or(HashError::TrackNotFound {
            instrument,
            difficulty,
        })?;
    let bytes = serialize_track(chart, track);
    let digest = blake3::hash(&bytes);
    Ok(TrackHash {
        hash: URL_SAFE_NO_PAD.encode(digest.as_bytes()),
        bytes,
    })
}

/// Packs a normalized track into the BTRACK layout.
pub(crate) fn serialize_track(chart: &ParsedChart, track: &ParsedTrack) -> Vec<u8> {
    let mut buf = Writer::default();
    buf.0.extend_from_slice(&MAGIC);
    buf.u32(VERSION);
    buf.u32(chart.resolution as u32);

    // Markers sharing a tick keep only the last defined one.
    let tempos = last_per_tick(chart.tempos.iter().map(|tempo| (tempo.tick, tempo)));
    buf.u32(tempos.len() as u32);
    for tempo in tempos {
        buf.i64(tempo.tick);
        buf.f64(tempo.bpm);
    }
    let time_signatures =
        last_per_tick(chart.time_signatures.iter().map(|ts| (ts.tick, ts)));
    buf.u32(time_signatures.len() as u32);
    for ts in time_signatures {
        buf.i64(ts.tick);
        buf.u32(ts.numerator);
        buf.u32(ts.denominator);
    }

    let note_ticks: Vec<i64> = track
        .note_event_groups
        .iter()
        .filter_map(|group| group.first())
        .map(|note| note.tick)
        .collect();

    let star_power = pruned(&track.star_power_sections, &note_ticks, |phrase| *phrase);
    buf.u32(star_power.len() as u32);
    for phrase in &star_power {
        buf.i64(phrase.tick);
        buf.i64(phrase.length);
    }
    let solos = pruned(&track.solo_sections, &note_ticks, |phrase| *phrase);
    buf.u32(solos.len() as u32);
    for phrase in &solos {
        buf.i64(phrase.tick);
        buf.i64(phrase.length);
    }
    let flex = pruned(&track.flex_lanes, &note_ticks, |lane| lane.phrase);
    buf.u32(flex.len() as u32);
    for lane in &flex {
        buf.i64(lane.phrase.tick);
        buf.i64(lane.phrase.length);
        buf.u8(u8::from(lane.is_double));
    }
    let freestyle = pruned(&track.drum_freestyle_sections, &note_ticks, |section| {
        section.phrase
    });
    buf.u32(freestyle.len() as u32);
    for section in &freestyle {
        buf.i64(section.phrase.tick);
        buf.i64(section.phrase.length);
        buf.u8(u8::from(section.is_coda));
    }

    buf.u32(track.note_count() as u32);
    for note in track.all_notes() {
        buf.i64(note.tick);
        buf.i64(note.length);
        buf.u32(note.note_type.as_u32());
        buf.u32(note.flags.bits());
    }
    buf.0
}

/// Keeps only the last marker defined at each tick. The input is sorted by
/// tick.
fn last_per_tick<T>(markers: impl Iterator<Item = (i64, T)>) -> Vec<T> {
    let mut kept: Vec<(i64, T)> = Vec::new();
    for (tick, marker) in markers {
        match kept.last_mut() {
            Some(last) if last.0 == tick => last.1 = marker,
            _ => kept.push((tick, marker)),
        }
    }
    kept.into_iter().map(|(_, marker)| marker).collect()
}

/// Excludes phrases with zero notes strictly inside their half-open window.
fn pruned<'a, T>(
    phrases: &'a [T],
    note_ticks: &[i64],
    phrase_of: impl Fn(&T) -> Phrase,
) -> Vec<&'a T> {
    phrases
        .iter()
        .filter(|entry| {
            let window = phrase_of(entry).note_window();
            let start = note_ticks.partition_point(|&tick| tick < window.start);
            let end = note_ticks.partition_point(|&tick| tick < window.end);
            end > start
        })
        .collect()
}

#[derive(Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn u8(&mut self, value: u8) {
        self.0.push(value);
    }
    fn u32(&mut self, value: u32) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }
    fn i64(&mut self, value: i64) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }
    fn f64(&mut self, value: f64) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }
}
