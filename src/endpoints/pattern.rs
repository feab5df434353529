//! Path template parsing.
//!
//! # Responsibilities
//! - Parse a path template (`/storage/v1/b/{bucket}/o/{object}`) into segments
//! - Reject templates the tree cannot represent
//! - Match a concrete segment against a parameter suffix
//!
//! # Design Decisions
//! - Literal segments are case-sensitive
//! - `{name}` and `*` match exactly one non-empty segment
//! - `{+name}`, `{name=**}` and `**` match the rest of the path and must come last
//! - A `:verb` suffix after a parameter is kept (Google custom methods)
//! - No regex, so matching a segment is a plain string comparison

use std::fmt;

use thiserror::Error;

/// Reasons a path template is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("path template must start with '/'")]
    MissingLeadingSlash,

    #[error("empty segment at position {0}")]
    EmptySegment(usize),

    #[error("unbalanced braces in segment '{0}'")]
    UnbalancedBraces(String),

    #[error("parameter in segment '{0}' must start the segment")]
    LiteralPrefix(String),

    #[error("parameter in segment '{0}' has no name")]
    UnnamedParameter(String),

    #[error("catch-all segment '{0}' must be the last segment")]
    CatchAllNotLast(String),
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact, case-sensitive segment text.
    Literal(String),
    /// Exactly one segment, optionally ending in a fixed suffix.
    Param { suffix: Option<String> },
    /// The non-empty remainder of the path, optionally ending in a fixed suffix.
    CatchAll { suffix: Option<String> },
}

/// Checks a non-empty value, optionally requiring a suffix with at least one
/// character in front of it.
pub(crate) fn matches_with_suffix(value: &str, suffix: Option<&str>) -> bool {
    match suffix {
        Some(suffix) => value.len() > suffix.len() && value.ends_with(suffix),
        None => !value.is_empty(),
    }
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a path template.
    ///
    /// `/` parses to a pattern with no segments (the root).
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let rest = template
            .strip_prefix('/')
            .ok_or(PatternError::MissingLeadingSlash)?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let raw: Vec<&str> = rest.split('/').collect();
            let last = raw.len() - 1;
            for (i, part) in raw.iter().enumerate() {
                let segment = parse_segment(part, i)?;
                if matches!(segment, Segment::CatchAll { .. }) && i != last {
                    return Err(PatternError::CatchAllNotLast((*part).to_string()));
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template text as written in the table.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parsed segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true for the root pattern `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn parse_segment(part: &str, position: usize) -> Result<Segment, PatternError> {
    if part.is_empty() {
        return Err(PatternError::EmptySegment(position));
    }
    match part {
        "*" => return Ok(Segment::Param { suffix: None }),
        "**" => return Ok(Segment::CatchAll { suffix: None }),
        _ => {}
    }

    let Some(open) = part.find('{') else {
        if part.contains('}') {
            return Err(PatternError::UnbalancedBraces(part.to_string()));
        }
        return Ok(Segment::Literal(part.to_string()));
    };
    if open != 0 {
        return Err(PatternError::LiteralPrefix(part.to_string()));
    }
    let close = part
        .find('}')
        .ok_or_else(|| PatternError::UnbalancedBraces(part.to_string()))?;

    let inner = &part[1..close];
    let tail = &part[close + 1..];
    if inner.contains('{') || tail.contains('{') || tail.contains('}') {
        return Err(PatternError::UnbalancedBraces(part.to_string()));
    }

    let (name, catch_all) = match inner.strip_prefix('+') {
        Some(name) => (name, true),
        None => match inner.split_once('=') {
            Some((name, "**")) => (name, true),
            Some((name, "*")) => (name, false),
            Some(_) => return Err(PatternError::UnbalancedBraces(part.to_string())),
            None => (inner, false),
        },
    };
    if name.is_empty() {
        return Err(PatternError::UnnamedParameter(part.to_string()));
    }

    let suffix = (!tail.is_empty()).then(|| tail.to_string());
    Ok(if catch_all {
        Segment::CatchAll { suffix }
    } else {
        Segment::Param { suffix }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    #[test]
    fn test_parse_literals_and_params() {
        let p = PathPattern::parse("/storage/v1/b/{bucket}/o/{object}").unwrap();
        assert_eq!(
            p.segments(),
            &[
                lit("storage"),
                lit("v1"),
                lit("b"),
                Segment::Param { suffix: None },
                lit("o"),
                Segment::Param { suffix: None },
            ]
        );
        assert_eq!(p.template(), "/storage/v1/b/{bucket}/o/{object}");
    }

    #[test]
    fn test_parse_root() {
        let p = PathPattern::parse("/").unwrap();
        assert!(p.is_root());
    }

    #[test]
    fn test_parse_catch_all_forms() {
        for t in ["/v1/{+name}", "/v1/{name=**}", "/v1/**"] {
            let p = PathPattern::parse(t).unwrap();
            assert_eq!(p.segments()[1], Segment::CatchAll { suffix: None }, "{t}");
        }
        let p = PathPattern::parse("/v1/{+name}:cancel").unwrap();
        assert_eq!(
            p.segments()[1],
            Segment::CatchAll { suffix: Some(":cancel".into()) }
        );
    }

    #[test]
    fn test_parse_custom_verb_param() {
        let p = PathPattern::parse("/v1/{resource}:getIamPolicy").unwrap();
        assert_eq!(
            p.segments()[1],
            Segment::Param { suffix: Some(":getIamPolicy".into()) }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathPattern::parse("v1/x"), Err(PatternError::MissingLeadingSlash));
        assert_eq!(PathPattern::parse("/v1//x"), Err(PatternError::EmptySegment(1)));
        assert!(matches!(PathPattern::parse("/v1/{x"), Err(PatternError::UnbalancedBraces(_))));
        assert!(matches!(PathPattern::parse("/v1/x}"), Err(PatternError::UnbalancedBraces(_))));
        assert!(matches!(PathPattern::parse("/v1/a{x}"), Err(PatternError::LiteralPrefix(_))));
        assert!(matches!(PathPattern::parse("/v1/{}"), Err(PatternError::UnnamedParameter(_))));
        assert!(matches!(
            PathPattern::parse("/v1/{+name}/x"),
            Err(PatternError::CatchAllNotLast(_))
        ));
    }

    #[test]
    fn test_suffix_matching() {
        assert!(matches_with_suffix("bucket", None));
        assert!(!matches_with_suffix("", None));
        assert!(matches_with_suffix("op:cancel", Some(":cancel")));
        assert!(!matches_with_suffix(":cancel", Some(":cancel")));
        assert!(!matches_with_suffix("op", Some(":cancel")));
    }
}
