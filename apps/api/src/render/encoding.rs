//! WinAnsiEncoding, the single-byte encoding printpdf uses for the built-in fonts.
//!
//! A character with no WinAnsi code is dropped by the PDF writer without an error,
//! so every string is normalized and checked here before it is painted.

use super::RenderError;

/// The 0x80..=0x9F block: typographic characters that sit outside Latin-1.
#[rustfmt::skip]
const HIGH_BLOCK: [(char, u8); 27] = [
    ('\u{20AC}', 0x80), ('\u{201A}', 0x82), ('\u{0192}', 0x83), ('\u{201E}', 0x84),
    ('\u{2026}', 0x85), ('\u{2020}', 0x86), ('\u{2021}', 0x87), ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89), ('\u{0160}', 0x8A), ('\u{2039}', 0x8B), ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E), ('\u{2018}', 0x91), ('\u{2019}', 0x92), ('\u{201C}', 0x93),
    ('\u{201D}', 0x94), ('\u{2022}', 0x95), ('\u{2013}', 0x96), ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98), ('\u{2122}', 0x99), ('\u{0161}', 0x9A), ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C), ('\u{017E}', 0x9E), ('\u{0178}', 0x9F),
];

const SOFT_HYPHEN: char = '\u{AD}';

/// The WinAnsi byte for `ch`, if the encoding has one.
///
/// 0xA0 and 0xAD decode to a plain space and hyphen, so NBSP and the soft hyphen
/// have no code of their own and must be normalized first.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch as u32 {
        code @ 0x20..=0x7E => Some(code as u8),
        0xAD => None,
        code @ 0xA1..=0xFF => Some(code as u8),
        _ => HIGH_BLOCK
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, byte)| *byte),
    }
}

/// Replaces every whitespace character (NBSP, tab, line breaks, Unicode spaces)
/// with an ASCII space and removes soft hyphens.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != SOFT_HYPHEN)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// Fails on the first character the built-in fonts cannot show.
pub fn check(text: &str) -> Result<(), RenderError> {
    match text.chars().find(|c| win_ansi_byte(*c).is_none()) {
        Some(ch) => Err(RenderError::UnsupportedCharacter { ch }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) fn decode_byte(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | 0xA1..=0xFF if byte != 0xAD => Some(byte as char),
        _ => HIGH_BLOCK
            .iter()
            .find(|(_, b)| *b == byte)
            .map(|(c, _)| *c),
    }
}
