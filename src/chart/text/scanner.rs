//! The bracket/brace scanner for `.chart` sources.
//!
//! Three states: outside a section, reading a `[name]`, and inside a `{}`
//! body. Body lines of the form `KEY = VALUE` are captured with both sides
//! trimmed; the split is on the first `=` so values containing `=` survive.

use super::TextParseError;

/// One scanned section: its name and its raw `KEY = VALUE` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionText<'a> {
    pub(crate) name: &'a str,
    pub(crate) lines: Vec<(&'a str, &'a str)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    AwaitBody,
    InBody,
}

pub(crate) fn scan(source: &str) -> Result<Vec<SectionText<'_>>, TextParseError> {
    let mut sections: Vec<SectionText<'_>> = Vec::new();
    let mut state = State::Outside;

    for raw_line in source.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        match state {
            State::Outside => {
                if let Some(rest) = line.strip_prefix('[') {
                    // The name must close on the same line; a newline inside
                    // a section name is unrecoverable.
                    let Some(end) = rest.find(']') else {
                        return Err(TextParseError::UnterminatedSectionName);
                    };
                    sections.push(SectionText {
                        name: rest[..end].trim(),
                        lines: Vec::new(),
                    });
                    state = State::AwaitBody;
                }
            }
            State::AwaitBody => {
                if line.starts_with('{') {
                    state = State::InBody;
                } else if line.starts_with('[') {
                    // Section without a body; rescan this line as a name.
                    let Some(end) = line[1..].find(']') else {
                        return Err(TextParseError::UnterminatedSectionName);
                    };
                    sections.push(SectionText {
                        name: line[1..1 + end].trim(),
                        lines: Vec::new(),
                    });
                }
            }
            State::InBody => {
                if line.starts_with('}') {
                    state = State::Outside;
                } else if let Some((key, value)) = line.split_once('=') {
                    let section = sections
                        .last_mut()
                        .expect("a body is only entered after a name");
                    section.lines.push((key.trim(), value.trim()));
                }
            }
        }
    }
    Ok(sections)
}
