//! Integration tests for `chart_rs::chart`.

mod hashing;
mod scenarios;
mod smf;
mod text_parser;

use chart_rs::chart::prelude::*;

/// Parses `.chart` text with the given modifiers, panicking on failure.
pub fn parse_text(source: &str, mods: &IniChartModifiers) -> ParsedChart {
    parse_chart(source.as_bytes(), ChartFormat::Chart, mods)
        .expect("chart source must parse")
}

/// Parses `.chart` text with default modifiers.
pub fn parse_text_default(source: &str) -> ParsedChart {
    parse_text(source, &IniChartModifiers::default())
}

/// Parses SMF bytes with the given modifiers, panicking on failure.
pub fn parse_mid(bytes: &[u8], mods: &IniChartModifiers) -> ParsedChart {
    parse_chart(bytes, ChartFormat::Mid, mods).expect("mid bytes must parse")
}

/// The single track of an instrument/difficulty, panicking when absent.
pub fn track(chart: &ParsedChart, instrument: Instrument, difficulty: Difficulty) -> &ParsedTrack {
    chart
        .track(instrument, difficulty)
        .expect("requested track must exist")
}
