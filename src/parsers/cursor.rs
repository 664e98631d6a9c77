//! A small cursor over fused tokens for the recursive-descent parser.

use super::{
    fuser::FusedToken,
    integer::to_int_with,
    lexer::{Token, TokenKind},
};
use crate::{
    error::{ErrorMessage, ParseError},
    options::ParseOptions,
};

/// `Cursor` tracks the parser's position within a fused token sequence.
///
/// Reading past the last token behaves as if an [`TokenKind::End`] token
/// were repeated forever, so productions never index out of bounds.
#[derive(Debug)]
pub(crate) struct Cursor<'t, 'a> {
    tokens: &'t [FusedToken<'a>],
    pos: usize,
    options: ParseOptions,
}

impl<'t, 'a> Cursor<'t, 'a> {
    /// Create a new cursor at the first token.
    #[must_use]
    pub(crate) const fn new(tokens: &'t [FusedToken<'a>], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
        }
    }

    pub(crate) const fn options(&self) -> ParseOptions {
        self.options
    }

    /// Get current position
    pub(crate) const fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the token at the current position.
    pub(crate) fn current(&self) -> Option<&'t FusedToken<'a>> {
        self.peek_n(0)
    }

    /// Peeks the token `n` positions ahead.
    pub(crate) fn peek_n(&self, n: usize) -> Option<&'t FusedToken<'a>> {
        self.tokens.get(self.pos + n)
    }

    /// The kind of the token `n` positions ahead.
    pub(crate) fn kind_n(&self, n: usize) -> TokenKind {
        self.peek_n(n).map_or(TokenKind::End, FusedToken::kind)
    }

    /// The kind of the current token.
    pub(crate) fn kind(&self) -> TokenKind {
        self.kind_n(0)
    }

    /// Returns whether the current token is the identifier `text`.
    pub(crate) fn at_ident(&self, text: &str) -> bool {
        self.current()
            .and_then(|t| t.raw_of(TokenKind::Ident))
            .is_some_and(|t| t.text == text)
    }

    /// Advances the cursor by one token.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consumes and returns the current token when it is a raw token of
    /// `kind`.
    pub(crate) fn next_if(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        let token = *self.current()?.raw_of(kind)?;
        self.advance();
        Some(token)
    }

    /// Consumes the current token, which must be a raw token of `kind`.
    ///
    /// `expected` describes the token in the error message.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token<'a>, ParseError> {
        self.next_if(kind).ok_or_else(|| self.unexpected(expected))
    }

    /// Consumes a number token and converts it with the configured integer
    /// syntax. `label` names the value in error messages.
    ///
    /// A value that does not fit `T` is a range error.
    pub(crate) fn number_as<T: TryFrom<i64>>(
        &mut self,
        label: &'static str,
    ) -> Result<T, ParseError> {
        let pos = self.pos;
        let token = self.expect(TokenKind::Number, label)?;
        let value = to_int_with(token.text, label, pos, self.options.integer_syntax)
            .map_err(|err| err.with_span(token.start, token.end))?;
        T::try_from(value).map_err(|_| {
            ParseError::range(ErrorMessage::IntegerOutOfRange(label), pos)
                .with_span(token.start, token.end)
        })
    }

    /// Builds a syntax error pointing at the current token.
    pub(crate) fn error(&self, msg: ErrorMessage) -> ParseError {
        self.at_current(ParseError::syntax(msg, self.pos))
    }

    /// Builds a range error pointing at the current token.
    pub(crate) fn range_error(&self, msg: ErrorMessage) -> ParseError {
        self.at_current(ParseError::range(msg, self.pos))
    }

    /// Builds an "expected X, found Y" error for the current token.
    pub(crate) fn unexpected(&self, expected: &'static str) -> ParseError {
        self.error(ErrorMessage::UnexpectedToken {
            expected,
            found: self.kind(),
        })
    }

    /// Attaches the current token's byte span to `err`.
    pub(crate) fn at_current(&self, err: ParseError) -> ParseError {
        match self.current() {
            Some(token) => err.with_span(token.start(), token.end()),
            None => err,
        }
    }

    /// Closes the cursor by checking that only the end token remains.
    pub(crate) fn close(&self) -> Result<(), ParseError> {
        match self.kind() {
            TokenKind::End => Ok(()),
            found => Err(self.error(ErrorMessage::ExpectedEnd(found))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::{
        error::{ErrorKind, ErrorMessage},
        options::ParseOptions,
        parsers::{fuse_offsets, lex, TokenKind},
    };

    #[test]
    fn reads_past_the_end_as_end() {
        let tokens = fuse_offsets(lex("12").unwrap());
        let mut cursor = Cursor::new(&tokens, ParseOptions::default());
        assert_eq!(cursor.number_as::<u8>("hour"), Ok(12));
        assert_eq!(cursor.kind(), TokenKind::End);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.kind(), TokenKind::End);
        assert_eq!(cursor.pos(), 2);
        assert!(cursor.close().is_ok());
    }

    #[test]
    fn numbers_narrow_to_the_target_type() {
        let tokens = fuse_offsets(lex("300").unwrap());
        let mut cursor = Cursor::new(&tokens, ParseOptions::default());
        let err = cursor.number_as::<u8>("hour").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), ErrorMessage::IntegerOutOfRange("hour"));
        assert_eq!(err.span(), Some((0, 3)));
    }

    #[test]
    fn errors_carry_index_and_span() {
        let tokens = fuse_offsets(lex("10 : x").unwrap());
        let mut cursor = Cursor::new(&tokens, ParseOptions::default());
        cursor.advance();
        assert!(cursor.next_if(TokenKind::Number).is_none());
        assert!(cursor.expect(TokenKind::Colon, "':'").is_ok());

        let err = cursor.expect(TokenKind::Number, "minute").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(
            err.message(),
            ErrorMessage::UnexpectedToken {
                expected: "minute",
                found: TokenKind::Ident
            }
        );
        assert_eq!(err.position(), 2);
        assert_eq!(err.span(), Some((5, 6)));

        let err = cursor.close().unwrap_err();
        assert_eq!(err.message(), ErrorMessage::ExpectedEnd(TokenKind::Ident));
    }

    #[test]
    fn identifier_lookahead() {
        let tokens = fuse_offsets(lex("P1D").unwrap());
        let cursor = Cursor::new(&tokens, ParseOptions::default());
        assert!(cursor.at_ident("P"));
        assert!(!cursor.at_ident("D"));
        assert_eq!(cursor.kind_n(1), TokenKind::Number);
    }
}
