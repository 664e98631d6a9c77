//! The lexer for temporal strings.
//!
//! The source is scanned once, left to right. Outside brackets the lexer
//! recognizes date/time punctuation; between `[` and `]` it switches to a
//! wider alphabet so that annotation bodies like `u-ca=iso8601` or
//! `Etc/GMT+8` come out as words.

use alloc::vec::Vec;
use core::fmt;

use super::grammar::{is_bracket_word_char, is_digit, is_letter, is_marker, is_whitespace};
use crate::error::{ErrorMessage, LexError};

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of ASCII digits.
    Number,
    /// A run of letters. Outside brackets it never contains `T` or `Z`.
    Ident,
    Dash,
    Colon,
    Dot,
    Plus,
    Slash,
    Comma,
    Equals,
    Underscore,
    Exclamation,
    /// The date/time separator `T`.
    T,
    /// The UTC designator `Z`.
    Z,
    LBracket,
    RBracket,
    /// A word inside brackets that is not purely letters, e.g. `u-ca`.
    BracketText,
    /// A fused offset such as `+08:00`. Never produced by [`lex`], only by
    /// [`fuse_offsets`][super::fuse_offsets].
    TimeZoneOffset,
    /// The zero-width token closing every token stream.
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => "number",
            Self::Ident => "identifier",
            Self::Dash => "'-'",
            Self::Colon => "':'",
            Self::Dot => "'.'",
            Self::Plus => "'+'",
            Self::Slash => "'/'",
            Self::Comma => "','",
            Self::Equals => "'='",
            Self::Underscore => "'_'",
            Self::Exclamation => "'!'",
            Self::T => "'T'",
            Self::Z => "'Z'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::BracketText => "bracket text",
            Self::TimeZoneOffset => "UTC offset",
            Self::End => "end of input",
        }
        .fmt(f)
    }
}

/// A lexical token borrowing its text from the source.
///
/// `start` and `end` are half-open byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    /// Returns whether this token is `+` or `-`.
    #[inline]
    pub fn is_sign(&self) -> bool {
        matches!(self.kind, TokenKind::Plus | TokenKind::Dash)
    }
}

/// Scans `source` into tokens.
///
/// The returned sequence always ends with a [`TokenKind::End`] token whose
/// span is `source.len()..source.len()`. Whitespace separates tokens and is
/// otherwise dropped.
///
/// # Errors
///
/// Returns a [`LexError`] at the first character that is not allowed in the
/// current mode, or at the opening `[` of an unterminated bracket.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).run()
}

/// Maps the single character punctuation shared by both modes.
const fn punctuation(ch: u8) -> Option<TokenKind> {
    let kind = match ch {
        b'-' => TokenKind::Dash,
        b':' => TokenKind::Colon,
        b'.' => TokenKind::Dot,
        b'+' => TokenKind::Plus,
        b'/' => TokenKind::Slash,
        b',' => TokenKind::Comma,
        b'=' => TokenKind::Equals,
        b'_' => TokenKind::Underscore,
        b'!' => TokenKind::Exclamation,
        _ => return None,
    };
    Some(kind)
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            // Most temporal strings produce roughly one token per two bytes.
            tokens: Vec::with_capacity(source.len() / 2 + 1),
        }
    }

    fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            text: &self.source[start..self.pos],
            start,
            end: self.pos,
        });
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start);
    }

    /// Advances while `f` holds for the current byte.
    fn advance_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&f) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, msg: fn(char) -> ErrorMessage) -> LexError {
        // The cursor only ever steps over ASCII, so `pos` is a char boundary.
        let ch = self.source[self.pos..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        LexError::new(msg(ch), self.pos)
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, LexError> {
        while let Some(ch) = self.current() {
            if is_whitespace(ch) {
                self.pos += 1;
            } else if ch == b'[' {
                self.bracket()?;
            } else if is_digit(ch) {
                let start = self.pos;
                self.advance_while(is_digit);
                self.push(TokenKind::Number, start);
            } else if is_letter(ch) {
                self.ident(ch);
            } else if let Some(kind) = punctuation(ch) {
                self.single(kind);
            } else {
                return Err(self.unexpected(ErrorMessage::UnexpectedChar));
            }
        }
        self.push(TokenKind::End, self.pos);
        Ok(self.tokens)
    }

    /// `T` and `Z` are always a token of their own, so `DT` is `D` then `T`.
    fn ident(&mut self, first: u8) {
        let start = self.pos;
        if is_marker(first) {
            self.pos += 1;
            let kind = if first == b'T' {
                TokenKind::T
            } else {
                TokenKind::Z
            };
            self.push(kind, start);
            return;
        }
        self.advance_while(|ch| is_letter(ch) && !is_marker(ch));
        self.push(TokenKind::Ident, start);
    }

    fn bracket(&mut self) -> Result<(), LexError> {
        let open = self.pos;
        self.single(TokenKind::LBracket);
        loop {
            let Some(ch) = self.current() else {
                return Err(LexError::new(ErrorMessage::UnterminatedBracket, open));
            };
            if is_whitespace(ch) {
                self.pos += 1;
            } else if ch == b']' {
                self.single(TokenKind::RBracket);
                return Ok(());
            } else if is_letter(ch) || is_digit(ch) {
                let start = self.pos;
                self.advance_while(is_bracket_word_char);
                let word = &self.source.as_bytes()[start..self.pos];
                let kind = if word.iter().copied().all(is_letter) {
                    TokenKind::Ident
                } else {
                    TokenKind::BracketText
                };
                self.push(kind, start);
            } else if let Some(kind) = punctuation(ch) {
                self.single(kind);
            } else {
                return Err(self.unexpected(ErrorMessage::UnexpectedBracketChar));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{lex, TokenKind};
    use crate::error::ErrorMessage;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        lex(source).unwrap().iter().map(|t| t.text).collect()
    }

    #[test]
    fn date_time_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("2025-01-12T10:00:00.5Z"),
            [
                Number, Dash, Number, Dash, Number, T, Number, Colon, Number, Colon, Number, Dot,
                Number, Z, End
            ]
        );
    }

    #[test]
    fn markers_split_letter_runs() {
        assert_eq!(
            texts("P1Y2M3DT4H5M6S"),
            ["P", "1", "Y", "2", "M", "3", "D", "T", "4", "H", "5", "M", "6", "S", ""]
        );
        let tokens = lex("DTZab").unwrap();
        assert_eq!(tokens[0].text, "D");
        assert_eq!(tokens[1].kind, TokenKind::T);
        assert_eq!(tokens[2].kind, TokenKind::Z);
        assert_eq!(tokens[3].kind, TokenKind::Ident);
        assert_eq!(tokens[3].text, "ab");
    }

    #[test]
    fn bracket_words() {
        use TokenKind::*;
        let tokens = lex("[!u-ca=iso8601][Asia/Singapore][Etc/GMT+8][abc]").unwrap();
        let words: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, Ident | BracketText))
            .map(|t| (t.kind, t.text))
            .collect();
        assert_eq!(
            words,
            [
                (BracketText, "u-ca"),
                (BracketText, "iso8601"),
                (BracketText, "Asia/Singapore"),
                (BracketText, "Etc/GMT+8"),
                (Ident, "abc"),
            ]
        );
        assert_eq!(tokens[1].kind, Exclamation);
    }

    #[test]
    fn spans_skip_whitespace() {
        let tokens = lex(" 10 :\t30 ").unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| (t.start, t.end)).collect();
        assert_eq!(spans, [(1, 3), (4, 5), (6, 8), (9, 9)]);
    }

    #[test]
    fn end_token_is_zero_width() {
        for source in ["", "2025", "[x]", "  "] {
            let tokens = lex(source).unwrap();
            let end = tokens.last().unwrap();
            assert_eq!(end.kind, TokenKind::End);
            assert_eq!((end.start, end.end), (source.len(), source.len()));
        }
    }

    #[test]
    fn invalid_characters() {
        let err = lex("2025#01").unwrap_err();
        assert_eq!(err.offset(), 4);
        assert_eq!(err.message(), ErrorMessage::UnexpectedChar('#'));

        let err = lex("2025-01-01é").unwrap_err();
        assert_eq!(err.offset(), 10);
        assert_eq!(err.message(), ErrorMessage::UnexpectedChar('é'));

        let err = lex("2025[a;b]").unwrap_err();
        assert_eq!(err.offset(), 6);
        assert_eq!(err.message(), ErrorMessage::UnexpectedBracketChar(';'));

        let err = lex("2025]").unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn unterminated_bracket() {
        let err = lex("2025-01-01[Asia/Tokyo").unwrap_err();
        assert_eq!(err.message(), ErrorMessage::UnterminatedBracket);
        assert_eq!(err.offset(), 10);
    }

    proptest! {
        #[test]
        fn spans_are_ordered_and_end_last(
            source in "[0-9A-Za-z:.,+\\-/=_! \\t]{0,24}(\\[[a-z0-9=/+\\- ]{0,8}\\])?",
        ) {
            if let Ok(tokens) = lex(&source) {
                for token in &tokens {
                    prop_assert!(token.start <= token.end);
                    prop_assert_eq!(&source[token.start..token.end], token.text);
                }
                for pair in tokens.windows(2) {
                    prop_assert!(pair[0].end <= pair[1].start);
                }
                let end = tokens.last().unwrap();
                prop_assert_eq!(end.kind, TokenKind::End);
                prop_assert_eq!((end.start, end.end), (source.len(), source.len()));
                prop_assert_eq!(
                    tokens.iter().filter(|t| t.kind == TokenKind::End).count(),
                    1
                );
            }
        }
    }
}
