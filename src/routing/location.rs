//! Navigable locations.
//!
//! A location is what the history stack stores: a path plus the query and
//! hash that travel with it. Route matching only ever looks at the path.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A parsed location (`/article/42?ref=home#comments`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Location {
    /// Location with a path only.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            query: Vec::new(),
            hash: None,
        }
    }

    /// Parse a full path. Splits on the first `#`, then on the first `?`.
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (rest, Vec::new()),
        };

        Self {
            path: normalize_path(path),
            query,
            hash,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_hash(mut self, hash: Option<String>) -> Self {
        self.hash = hash;
        self
    }

    /// First value for a query key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path, query and hash serialized back into one string.
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(
                &form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(self.query.iter())
                    .finish(),
            );
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Location::parse(raw)
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Normalize a base prefix: leading slash, no trailing slash, `/` becomes empty.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Remove a (normalized) base prefix from a URL path.
///
/// Returns `None` when the path lies outside the base. The prefix must end
/// on a segment boundary, so base `/news` does not claim `/newsletter`.
pub fn strip_base<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Prefix a (normalized) base onto a full path.
pub fn join_base(base: &str, full_path: &str) -> String {
    format!("{}{}", base, full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_query_and_hash() {
        let loc = Location::parse("/article/42?ref=home&tag=rust#comments");
        assert_eq!(loc.path, "/article/42");
        assert_eq!(loc.query_value("ref"), Some("home"));
        assert_eq!(loc.query_value("tag"), Some("rust"));
        assert_eq!(loc.hash.as_deref(), Some("comments"));
        assert_eq!(loc.full_path(), "/article/42?ref=home&tag=rust#comments");
    }

    #[test]
    fn test_question_mark_inside_hash_stays_in_hash() {
        let loc = Location::parse("/#top?x=1");
        assert_eq!(loc.path, "/");
        assert!(loc.query.is_empty());
        assert_eq!(loc.hash.as_deref(), Some("top?x=1"));
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("article/7").path, "/article/7");
        assert_eq!(Location::parse("?page=2").path, "/");
    }

    #[test]
    fn test_query_is_form_encoded() {
        let loc = Location::new("/").with_query(vec![("q".into(), "rust lang".into())]);
        assert_eq!(loc.full_path(), "/?q=rust+lang");
        assert_eq!(Location::parse("/?q=rust+lang").query_value("q"), Some("rust lang"));
    }

    #[test]
    fn test_base_handling() {
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base("news/"), "/news");

        assert_eq!(strip_base("/news", "/news/article/1"), Some("/article/1"));
        assert_eq!(strip_base("/news", "/news"), Some("/"));
        assert_eq!(strip_base("/news", "/newsletter"), None);
        assert_eq!(strip_base("/news", "/other"), None);
        assert_eq!(strip_base("", "/article/1"), Some("/article/1"));

        assert_eq!(join_base("/news", "/article/1"), "/news/article/1");
    }
}
