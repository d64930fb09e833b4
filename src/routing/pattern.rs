//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile `/article/:id`-style patterns into segments
//! - Match a concrete path, binding named parameters
//! - Build a concrete path back from parameters (reverse routing)
//! - Detect patterns that could match the same path
//!
//! # Design Decisions
//! - Static segments are case-insensitive unless `sensitive` is set
//! - One trailing slash is tolerated unless `strict` is set
//! - A parameter binds exactly one non-empty segment
//! - No regex; matching is a single pass over the segments

use std::collections::HashSet;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::routing::error::{Result, RouteError};
use crate::routing::view::Params;

/// Characters escaped when a parameter value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Options applied to every pattern in a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Compare static segments case-sensitively.
    pub sensitive: bool,
    /// Require the trailing slash to match exactly.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
    options: MatchOptions,
}

impl PathPattern {
    /// Compile a pattern such as `/` or `/article/:id`.
    pub fn parse(raw: &str, options: MatchOptions) -> Result<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let body = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        let trailing_slash = body.len() > 1 && body.ends_with('/');
        let body = if trailing_slash { &body[..body.len() - 1] } else { body };

        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        if !body.is_empty() {
            for part in body.split('/') {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }
                match part.strip_prefix(':') {
                    Some(name) => {
                        if name.is_empty() {
                            return Err(invalid("parameter name is empty"));
                        }
                        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                            return Err(invalid(&format!("invalid parameter name `{}`", name)));
                        }
                        if !seen.insert(name.to_string()) {
                            return Err(invalid(&format!("parameter `{}` repeated", name)));
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Static(part.to_string())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            trailing_slash,
            options,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match a concrete path (no query or hash), binding parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let body = path.strip_prefix('/')?;
        let has_trailing = body.len() > 1 && body.ends_with('/');
        if self.options.strict && has_trailing != self.trailing_slash {
            return None;
        }
        let body = if has_trailing { &body[..body.len() - 1] } else { body };

        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) => {
                    let equal = if self.options.sensitive {
                        expected == part
                    } else {
                        expected.eq_ignore_ascii_case(part)
                    };
                    if !equal {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.as_str(), decode_segment(part));
                }
            }
        }
        Some(params)
    }

    /// Build a concrete path. Every parameter must be present and non-empty;
    /// parameters the pattern does not use are ignored.
    pub fn build(&self, route: &str, params: &Params) -> Result<String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(s) => out.push_str(s),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouteError::MissingParam {
                            route: route.to_string(),
                            param: name.clone(),
                        })?;
                    out.extend(utf8_percent_encode(value, SEGMENT));
                }
            }
        }
        if self.trailing_slash {
            out.push('/');
        }
        Ok(out)
    }

    /// True when some concrete path would match both patterns.
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        if self.options.strict
            && other.options.strict
            && self.trailing_slash != other.trailing_slash
        {
            return false;
        }
        let sensitive = self.options.sensitive && other.options.sensitive;
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|pair| match pair {
                (Segment::Static(a), Segment::Static(b)) => {
                    if sensitive {
                        a == b
                    } else {
                        a.eq_ignore_ascii_case(b)
                    }
                }
                _ => true,
            })
    }
}

fn decode_segment(part: &str) -> String {
    percent_decode_str(part)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(raw: &str) -> PathPattern {
        PathPattern::parse(raw, MatchOptions::default()).unwrap()
    }

    #[test]
    fn test_root_pattern() {
        let root = pattern("/");
        assert_eq!(root.matches("/"), Some(Params::new()));
        assert!(root.matches("/article").is_none());
    }

    #[test]
    fn test_param_binding() {
        let article = pattern("/article/:id");
        let params = article.matches("/article/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));

        assert!(article.matches("/article").is_none());
        assert!(article.matches("/article/").is_none());
        assert!(article.matches("/article/42/comments").is_none());
        assert!(article.matches("/articles/42").is_none());
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let article = pattern("/article/:id");
        let params = article.matches("/article/caf%C3%A9%20news").unwrap();
        assert_eq!(params.get("id"), Some("café news"));

        // Invalid UTF-8 keeps the raw segment.
        let params = article.matches("/article/%FF").unwrap();
        assert_eq!(params.get("id"), Some("%FF"));
    }

    #[test]
    fn test_trailing_slash_and_case() {
        let article = pattern("/article/:id");
        assert!(article.matches("/article/42/").is_some());
        assert!(article.matches("/ARTICLE/42").is_some());

        let strict = PathPattern::parse(
            "/article/:id",
            MatchOptions { sensitive: true, strict: true },
        )
        .unwrap();
        assert!(strict.matches("/article/42/").is_none());
        assert!(strict.matches("/ARTICLE/42").is_none());
        assert!(strict.matches("/article/42").is_some());
    }

    #[test]
    fn test_build() {
        let article = pattern("/article/:id");
        let params = Params::new().with("id", "7");
        assert_eq!(article.build("ArticleDetail", &params).unwrap(), "/article/7");

        let params = Params::new().with("id", "a b/c");
        assert_eq!(article.build("ArticleDetail", &params).unwrap(), "/article/a%20b%2Fc");

        assert_eq!(pattern("/").build("NewsFeed", &Params::new()).unwrap(), "/");
    }

    #[test]
    fn test_build_missing_param() {
        let article = pattern("/article/:id");
        let err = article.build("ArticleDetail", &Params::new()).unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingParam {
                route: "ArticleDetail".into(),
                param: "id".into()
            }
        );

        let empty = Params::new().with("id", "");
        assert!(article.build("ArticleDetail", &empty).is_err());
    }

    #[test]
    fn test_invalid_patterns() {
        for raw in ["article", "/article/:", "/a/:id/:id", "/a//b", "/a/:x-y"] {
            assert!(
                PathPattern::parse(raw, MatchOptions::default()).is_err(),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_overlaps() {
        assert!(pattern("/article/:id").overlaps(&pattern("/article/:slug")));
        assert!(pattern("/article/:id").overlaps(&pattern("/article/latest")));
        assert!(pattern("/Article/x").overlaps(&pattern("/article/x")));
        assert!(!pattern("/article/:id").overlaps(&pattern("/")));
        assert!(!pattern("/article/:id").overlaps(&pattern("/author/:id")));
    }
}
