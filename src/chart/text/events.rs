//! The little grammars of global chart events.
//!
//! Both formats carry the same event texts — `.chart` in `[Events]`, `.mid`
//! as (bracketed) text meta-events — so the matcher is shared.

use crate::chart::model::raw::RawEventKind;
use crate::chart::model::track::Difficulty;

/// A recognized global event text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalEvent<'a> {
    /// `section <name>` / `prc_<name>`: a practice-mode section.
    Section(&'a str),
    /// `end`.
    End,
    /// `coda`.
    Coda,
    /// `lyric …`.
    Lyric,
    /// `mix <d> drums <kit><flag>` with a flag that changes the disco
    /// register.
    DiscoFlip {
        difficulty: Difficulty,
        state: RawEventKind,
    },
    /// A `mix` event whose flag is deliberately ignored (`easy`,
    /// `easynokick`, unknown).
    Ignored,
    /// Anything else.
    Other,
}

pub(crate) fn parse_global_event(text: &str) -> GlobalEvent<'_> {
    if let Some(name) = strip_event_prefix(text, "section").or_else(|| strip_event_prefix(text, "prc"))
    {
        return GlobalEvent::Section(name);
    }
    if text == "end" {
        return GlobalEvent::End;
    }
    if text == "coda" {
        return GlobalEvent::Coda;
    }
    if text == "lyric" || text.starts_with("lyric ") {
        return GlobalEvent::Lyric;
    }
    if let Some(rest) = text.strip_prefix("mix ") {
        return parse_mix_event(rest);
    }
    GlobalEvent::Other
}

/// Strips `prefix` followed by a space or underscore separator.
fn strip_event_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(' ') | Some('_') => Some(chars.as_str().trim()),
        _ => None,
    }
}

/// Parses the tail of `mix <d> drums<kit><flag>`.
fn parse_mix_event(rest: &str) -> GlobalEvent<'_> {
    let mut words = rest.splitn(2, ' ');
    let difficulty = match words.next().and_then(|word| word.parse::<u8>().ok()) {
        Some(0) => Difficulty::Easy,
        Some(1) => Difficulty::Medium,
        Some(2) => Difficulty::Hard,
        Some(3) => Difficulty::Expert,
        _ => return GlobalEvent::Other,
    };
    let Some(tail) = words.next().and_then(|word| word.trim().strip_prefix("drums")) else {
        return GlobalEvent::Other;
    };
    // The kit digit is required; the flag follows it directly.
    let mut chars = tail.chars();
    if !chars.next().is_some_and(|kit| kit.is_ascii_digit()) {
        return GlobalEvent::Other;
    }
    let state = match chars.as_str() {
        "" => RawEventKind::DiscoFlipOff,
        "d" => RawEventKind::DiscoFlipOn,
        "dnoflip" => RawEventKind::DiscoNoFlipOn,
        // `easy` and `easynokick` are matched and deliberately ignored:
        // they neither start nor end a disco section.
        _ => return GlobalEvent::Ignored,
    };
    GlobalEvent::DiscoFlip { difficulty, state }
}
