//! The Clone Hero chart family parser.
//!
//! Charts for the Clone Hero family of rhythm games come in two on-disk
//! encodings: the bracketed text format `.chart` (born in GH3 customs and
//! extended by Moonscraper) and Standard MIDI Files `.mid` (the Rock Band
//! lineage). Both describe the same thing — which note to hit on which
//! instrument at which tick — but through very different conventions. This
//! crate lowers both into a single normalized, fully-timed representation,
//! and derives a content-addressed, score-sensitive hash per playable track.
//!
//! # Usage
//!
//! ```
//! use chart_rs::chart::prelude::*;
//!
//! let source = b"[Song]\n{\n  Resolution = 192\n}\n[SyncTrack]\n{\n  0 = B 120000\n  0 = TS 4\n}\n[ExpertSingle]\n{\n  0 = N 0 0\n}\n";
//! let chart = parse_chart(source, ChartFormat::Chart, &IniChartModifiers::default()).unwrap();
//! assert_eq!(chart.resolution, 192);
//!
//! let TrackHash { hash, .. } =
//!     hash_track(&chart, Instrument::Guitar, Difficulty::Expert).unwrap();
//! println!("expert guitar: {hash}");
//! ```
//!
//! # Pipeline
//!
//! - **Encoding detection** ([`chart::encoding`]) sniffs a UTF-16 byte-order
//!   mark and defaults to UTF-8.
//! - **Raw parsers** ([`chart::text`], [`chart::mid`]) lower each format into
//!   the shared raw event model without interpreting gameplay semantics.
//! - **Timing** ([`chart::timing`]) converts ticks to milliseconds through
//!   the tempo map.
//! - **Normalization** ([`chart::normalize`]) applies the long tail of rules
//!   the reference game applies: sustain trimming, open-note promotion, drum
//!   modifier and disco-flip resolution, HOPO/strum/tap resolution, chord
//!   snapping and overlap repair.
//! - **Hashing** ([`chart::hash`]) packs each normalized track into the
//!   frozen BTRACK layout and hashes it with BLAKE3.
//! - **Issue detection** ([`chart::issues`]) runs rule-based checks over the
//!   normalized output.
//!
//! Parsing is fail-closed: a structurally broken chart returns a
//! [`chart::ParseError`] and never partial output. Everything that is merely
//! questionable in an otherwise parseable chart is reported as a
//! [`chart::issues::ChartIssue`] instead.
//!
//! # About the `.chart` format
//!
//! A `.chart` file is a sequence of named sections. Each section holds
//! `key = value` lines between braces:
//!
//! ```text
//! [Song]
//! {
//!   Name = "Example Song"
//!   Resolution = 192
//! }
//! [SyncTrack]
//! {
//!   0 = TS 4
//!   0 = B 120000
//!   768 = B 140000
//! }
//! [ExpertSingle]
//! {
//!   0 = N 0 96
//!   192 = N 1 0
//!   192 = N 2 0
//!   384 = S 2 768
//! }
//! ```
//!
//! `N <lane> <length>` places a note, `S <kind> <length>` a special phrase,
//! and `E <text>` a local event. The `.mid` encoding expresses the same
//! content through note-on/note-off pairs in per-instrument tracks whose
//! names follow the `PART GUITAR` convention.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod chart;

pub use chart::{parse_chart, ChartFormat, ParseError};
