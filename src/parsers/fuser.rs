//! Offset fusion.
//!
//! The lexer cannot tell a `-` that separates date fields from a `-` that
//! starts a UTC offset. This pass looks at the tokens already emitted and
//! merges `±HH:MM`, `±HHMM`, and `±HH` runs into a single
//! [`FusedToken::Offset`] when, and only when, the sign follows something
//! an offset may follow.

use alloc::{string::String, vec::Vec};

use super::lexer::{Token, TokenKind};

/// A token after offset fusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FusedToken<'a> {
    Raw(Token<'a>),
    Offset(OffsetToken<'a>),
}

/// A composite offset token such as `+08:00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetToken<'a> {
    /// The concatenated text of `parts`.
    pub text: String,
    /// The raw tokens that were fused, starting with the sign.
    pub parts: Vec<Token<'a>>,
    pub start: usize,
    pub end: usize,
}

impl<'a> OffsetToken<'a> {
    fn from_parts(parts: Vec<Token<'a>>) -> Option<Self> {
        let start = parts.first()?.start;
        let end = parts.last()?.end;
        let text = parts.iter().map(|t| t.text).collect();
        Some(Self {
            text,
            parts,
            start,
            end,
        })
    }
}

impl<'a> FusedToken<'a> {
    #[inline]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Raw(token) => token.kind,
            Self::Offset(_) => TokenKind::TimeZoneOffset,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Self::Raw(token) => token.text,
            Self::Offset(offset) => &offset.text,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        match self {
            Self::Raw(token) => token.start,
            Self::Offset(offset) => offset.start,
        }
    }

    #[inline]
    pub fn end(&self) -> usize {
        match self {
            Self::Raw(token) => token.end,
            Self::Offset(offset) => offset.end,
        }
    }

    /// Returns the raw token of `kind`, if this is one.
    #[inline]
    pub(crate) fn raw_of(&self, kind: TokenKind) -> Option<&Token<'a>> {
        match self {
            Self::Raw(token) if token.kind == kind => Some(token),
            _ => None,
        }
    }
}

impl<'a> From<Token<'a>> for FusedToken<'a> {
    fn from(token: Token<'a>) -> Self {
        Self::Raw(token)
    }
}

/// Merges offset-shaped token runs into [`FusedToken::Offset`] tokens.
///
/// A `+` or `-` starts an offset only when a token was emitted before it
/// that is neither `Z` nor `]`, and, when that token is a number, the number
/// itself followed `:` or `.` (it closed a time or fraction). From such a
/// sign the shapes `sign Number ':' Number` and `sign Number` (exactly 2 or
/// 4 digits) are tried in that order; anything else is left untouched.
///
/// The pass is idempotent: already fused tokens never take part in a new
/// fusion, so `fuse_offsets(fuse_offsets(t)) == fuse_offsets(t)`.
pub fn fuse_offsets<'a, I, T>(tokens: I) -> Vec<FusedToken<'a>>
where
    I: IntoIterator<Item = T>,
    T: Into<FusedToken<'a>>,
{
    let input: Vec<FusedToken<'a>> = tokens.into_iter().map(Into::into).collect();
    let mut output: Vec<FusedToken<'a>> = Vec::with_capacity(input.len());

    let mut index = 0;
    while let Some(token) = input.get(index) {
        if may_start_offset(token, &output) {
            let fused = offset_shape_len(&input[index..]).and_then(|len| {
                let parts = input[index..index + len]
                    .iter()
                    .filter_map(|t| match t {
                        FusedToken::Raw(raw) => Some(*raw),
                        FusedToken::Offset(_) => None,
                    })
                    .collect();
                OffsetToken::from_parts(parts).map(|offset| (len, offset))
            });
            if let Some((len, offset)) = fused {
                #[cfg(feature = "log")]
                log::trace!(
                    "fused offset {:?} at {}..{}",
                    offset.text,
                    offset.start,
                    offset.end
                );
                output.push(FusedToken::Offset(offset));
                index += len;
                continue;
            }
        }
        output.push(token.clone());
        index += 1;
    }

    output
}

fn may_start_offset(token: &FusedToken<'_>, emitted: &[FusedToken<'_>]) -> bool {
    let FusedToken::Raw(sign) = token else {
        return false;
    };
    if !sign.is_sign() {
        return false;
    }
    let Some((previous, before)) = emitted.split_last() else {
        return false;
    };
    match previous.kind() {
        TokenKind::Z | TokenKind::RBracket => false,
        TokenKind::Number => before
            .last()
            .is_some_and(|t| matches!(t.kind(), TokenKind::Colon | TokenKind::Dot)),
        _ => true,
    }
}

/// The number of tokens an offset starting at `tokens[0]` spans.
fn offset_shape_len(tokens: &[FusedToken<'_>]) -> Option<usize> {
    let is_raw = |index: usize, kind: TokenKind| {
        tokens
            .get(index)
            .and_then(|t| t.raw_of(kind))
            .is_some()
    };
    let hours = tokens.get(1).and_then(|t| t.raw_of(TokenKind::Number))?;
    if is_raw(2, TokenKind::Colon) && is_raw(3, TokenKind::Number) {
        return Some(4);
    }
    matches!(hours.text.len(), 2 | 4).then_some(2)
}
