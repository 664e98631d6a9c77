//! Parsing for bracket groups: the time zone and key-value annotations.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use super::{cursor::Cursor, lexer::TokenKind};
use crate::{
    ast::{Annotation, AnnotationValue, TimeZone},
    error::ParseError,
    options::TimeZonePolicy,
};

/// The content of one `[...]` group before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BracketGroup {
    /// The inner token texts concatenated, including a leading `!`.
    pub(crate) raw: String,
    pub(crate) critical: bool,
}

impl BracketGroup {
    /// The content with the critical flag stripped.
    pub(crate) fn content(&self) -> &str {
        if self.critical {
            &self.raw[1..]
        } else {
            &self.raw
        }
    }
}

/// Parse any number of consecutive bracket groups.
pub(crate) fn parse_bracket_groups(
    cursor: &mut Cursor<'_, '_>,
) -> Result<Vec<BracketGroup>, ParseError> {
    let mut groups = Vec::new();
    while cursor.next_if(TokenKind::LBracket).is_some() {
        let mut raw = String::new();
        loop {
            match cursor.kind() {
                TokenKind::RBracket => {
                    cursor.advance();
                    break;
                }
                // Unreachable for lexer output, which always balances brackets.
                TokenKind::End | TokenKind::LBracket => return Err(cursor.unexpected("']'")),
                _ => {
                    if let Some(token) = cursor.current() {
                        raw.push_str(token.text());
                    }
                    cursor.advance();
                }
            }
        }
        let critical = raw.starts_with('!');
        groups.push(BracketGroup { raw, critical });
    }
    Ok(groups)
}

/// Splits bracket groups into an optional time zone and the remaining
/// annotations, in source order.
///
/// With [`TimeZonePolicy::FirstIanaLike`] the first group that
/// [looks like a time zone](looks_like_time_zone) becomes the time zone;
/// later time zone shaped groups stay annotations.
pub(crate) fn classify_groups(
    groups: Vec<BracketGroup>,
    policy: TimeZonePolicy,
) -> (Option<TimeZone>, Vec<Annotation>) {
    let mut time_zone = None;
    let mut annotations = Vec::with_capacity(groups.len());
    for group in groups {
        let promote = policy == TimeZonePolicy::FirstIanaLike
            && time_zone.is_none()
            && looks_like_time_zone(group.content());
        if promote {
            #[cfg(feature = "log")]
            log::debug!("bracket [{}] classified as time zone", group.raw);
            time_zone = Some(TimeZone {
                id: group.content().to_string(),
                critical: group.critical,
            });
        } else {
            #[cfg(feature = "log")]
            log::debug!("bracket [{}] classified as annotation", group.raw);
            annotations.push(into_annotation(group));
        }
    }
    (time_zone, annotations)
}

/// Best-effort check for an IANA style identifier: no `=`, and either a `/`
/// or the `Etc/` prefix.
///
/// This is a heuristic rather than a grammar rule. `[UTC]` is not a time
/// zone by this test while `[foo/bar]` is.
pub(crate) fn looks_like_time_zone(content: &str) -> bool {
    !content.contains('=') && (content.contains('/') || content.starts_with("Etc/"))
}

pub(crate) fn into_annotation(group: BracketGroup) -> Annotation {
    let entries = parse_entries(group.content());
    Annotation {
        raw: group.raw,
        critical: group.critical,
        entries,
    }
}

/// `segment (',' segment)*` where `segment := key ('=' value)?`.
fn parse_entries(content: &str) -> BTreeMap<String, AnnotationValue> {
    content
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (
                key.trim().to_string(),
                AnnotationValue::Text(value.trim().to_string()),
            ),
            None => (segment.to_string(), AnnotationValue::Flag),
        })
        .collect()
}
