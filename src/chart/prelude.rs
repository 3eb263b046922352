//! Prelude module for the chart core.
//!
//! Re-exports the whole public surface for convenient access:
//! `use chart_rs::chart::prelude::*;`.

pub use super::{
    encoding::{decode, detect, TextEncoding},
    find_issues, hash_track,
    hash::{HashError, TrackHash},
    issues::{ChartIssue, IssueKind, TrackHashId},
    mid::MidParseError,
    model::{
        ini::IniChartModifiers,
        marker::{EndEvent, Section, TempoMarker, TimeSignature},
        note::{NoteEvent, NoteFlags, NoteType},
        phrase::{FlexLane, FreestyleSection, Phrase},
        raw::{
            RawChart, RawEvent, RawEventKind, RawSection, RawTempo, RawTimeSignature, RawTrack,
        },
        track::{Difficulty, DrumType, Instrument, InstrumentType},
        ParsedChart, ParsedTrack,
    },
    parse_chart,
    text::TextParseError,
    timing::TempoMap,
    ChartFormat, ParseError,
};
