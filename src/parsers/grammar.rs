//! ASCII character classes used by the lexer.
//!
//! Non-ASCII characters never match, so the lexer rejects them instead of
//! passing them through.

/// Checks if ascii char is an ASCII letter.
#[inline]
pub const fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

/// Checks if ascii char is an ASCII digit.
#[inline]
pub const fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

/// Checks if ascii char may appear in a word inside brackets, e.g.
/// `Etc/GMT+8` or `u-ca`.
#[inline]
pub const fn is_bracket_word_char(ch: u8) -> bool {
    is_letter(ch) || is_digit(ch) || matches!(ch, b'-' | b'/' | b'+' | b'.')
}

/// Checks if ascii char is one of the single letter markers `T` or `Z`.
#[inline]
pub(crate) const fn is_marker(ch: u8) -> bool {
    matches!(ch, b'T' | b'Z')
}

/// Checks if ascii char is skipped between tokens.
#[inline]
pub(crate) const fn is_whitespace(ch: u8) -> bool {
    ch.is_ascii_whitespace()
}
