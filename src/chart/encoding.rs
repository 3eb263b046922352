//! Text encoding detection for `.chart` sources.
//!
//! The reference game accepts UTF-8 and both UTF-16 byte orders; detection
//! is by byte-order mark only, defaulting to UTF-8.

use std::borrow::Cow;

/// A text encoding a `.chart` file can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// UTF-8, the default.
    Utf8,
    /// UTF-16 little endian (BOM `FF FE`).
    Utf16Le,
    /// UTF-16 big endian (BOM `FE FF`).
    Utf16Be,
}

/// Infers the encoding of a byte slice from its byte-order mark.
#[must_use]
pub fn detect(bytes: &[u8]) -> TextEncoding {
    match bytes {
        [0xFF, 0xFE, ..] => TextEncoding::Utf16Le,
        [0xFE, 0xFF, ..] => TextEncoding::Utf16Be,
        _ => TextEncoding::Utf8,
    }
}

/// Decodes chart bytes to text, removing the BOM and replacing malformed
/// sequences.
#[must_use]
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let encoding = match detect(bytes) {
        TextEncoding::Utf8 => encoding_rs::UTF_8,
        TextEncoding::Utf16Le => encoding_rs::UTF_16LE,
        TextEncoding::Utf16Be => encoding_rs::UTF_16BE,
    };
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("chart text contained malformed {encoding:?} sequences; replaced");
    }
    text
}
