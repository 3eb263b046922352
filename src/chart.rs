//! The chart core: raw parsers, normalization pipeline, hashing and issue
//! detection.
//!
//! Raw bytes == [`text`]/[`mid`] ==> [`model::raw::RawChart`] ==
//! [`normalize`] ==> [`model::ParsedChart`] == [`hash`] ==> `TrackHash`
//!
//! The two raw parsers lower their very different on-disk encodings into the
//! same intermediate model; everything downstream of them is shared. A call
//! to [`parse_chart`] is a pure function from `(bytes, format, modifiers)`
//! to a [`model::ParsedChart`] — no I/O, no shared state, no partial output
//! on failure.

pub mod encoding;
pub mod hash;
pub mod issues;
pub mod mid;
pub mod model;
pub mod normalize;
pub mod prelude;
pub mod text;
pub mod timing;

use thiserror::Error;

use self::model::{ini::IniChartModifiers, ParsedChart};

/// The on-disk encoding of a chart file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartFormat {
    /// The bracketed text format, `notes.chart`.
    Chart,
    /// The Standard MIDI File format, `notes.mid`.
    Mid,
}

/// A fatal error from parsing a chart. Anything merely questionable in an
/// otherwise parseable chart is reported as a [`issues::ChartIssue`] instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// The `.chart` text structure was unrecoverable.
    #[error("invalid .chart file: {0}")]
    Text(#[from] text::TextParseError),
    /// The `.mid` file was rejected.
    #[error("invalid .mid file: {0}")]
    Mid(#[from] mid::MidParseError),
}

/// Parses a chart from raw bytes into its normalized, fully-timed form.
///
/// `mods` carries the handful of `song.ini` entries that change how a chart
/// is interpreted; pass [`IniChartModifiers::default`] when there is no ini.
///
/// This is fail-closed: ill-formed structure aborts with a descriptive
/// error and partial output is never returned.
pub fn parse_chart(
    bytes: &[u8],
    format: ChartFormat,
    mods: &IniChartModifiers,
) -> Result<ParsedChart, ParseError> {
    let raw = match format {
        ChartFormat::Chart => {
            let source = encoding::decode(bytes);
            text::parse(&source)?
        }
        ChartFormat::Mid => mid::parse(bytes)?,
    };
    log::debug!(
        "raw chart parsed: resolution {}, {} tracks",
        raw.resolution,
        raw.tracks.len()
    );
    Ok(normalize::normalize(raw, format, mods))
}

pub use hash::{hash_track, HashError, TrackHash};
pub use issues::find_issues;
