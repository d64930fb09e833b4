//! The compiled route table.
//!
//! # Responsibilities
//! - Hold the ordered route entries
//! - Look up the route for a path (first match wins)
//! - Reverse a route name plus parameters into a path
//! - Resolve a location under the configured not-found policy
//!
//! # Design Decisions
//! - Immutable after construction; shared via `Arc` without locks
//! - Names unique and patterns unambiguous, checked at construction
//! - Explicit `NotFound`/`Redirect` resolutions rather than a silent default

use serde::Serialize;

use crate::config::schema::{default_routes, NotFoundPolicy, RouteConfig};
use crate::routing::error::{Result, RouteError};
use crate::routing::location::Location;
use crate::routing::pattern::{MatchOptions, PathPattern};
use crate::routing::router::ActiveRoute;
use crate::routing::view::{Params, View};

/// One compiled route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    name: String,
    pattern: PathPattern,
    view: View,
}

impl RouteEntry {
    pub fn new(
        name: impl Into<String>,
        path: &str,
        view: View,
        options: MatchOptions,
    ) -> Result<Self> {
        let name = name.into();
        if view == View::NotFound {
            return Err(RouteError::ReservedView(name));
        }
        Ok(Self {
            pattern: PathPattern::parse(path, options)?,
            name,
            view,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

/// A route that matched a path, with its bound parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: Params,
}

/// Outcome of resolving a location against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A table route matched.
    Matched { route: ActiveRoute },
    /// Nothing matched; the not-found view takes over.
    NotFound { route: ActiveRoute },
    /// Nothing matched; the policy sent the navigation elsewhere.
    Redirect { from: Location, route: ActiveRoute },
}

impl Resolution {
    pub fn route(&self) -> &ActiveRoute {
        match self {
            Resolution::Matched { route }
            | Resolution::NotFound { route }
            | Resolution::Redirect { route, .. } => route,
        }
    }

    pub fn into_route(self) -> ActiveRoute {
        match self {
            Resolution::Matched { route }
            | Resolution::NotFound { route }
            | Resolution::Redirect { route, .. } => route,
        }
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate names and ambiguous patterns.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self> {
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.name == b.name {
                    return Err(RouteError::DuplicateName(b.name.clone()));
                }
                if a.pattern.overlaps(&b.pattern) {
                    return Err(RouteError::AmbiguousPattern {
                        first: a.name.clone(),
                        first_path: a.path().to_string(),
                        second: b.name.clone(),
                        second_path: b.path().to_string(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Compile the table from configuration entries.
    pub fn from_config(routes: &[RouteConfig], options: MatchOptions) -> Result<Self> {
        let entries = routes
            .iter()
            .map(|r| RouteEntry::new(r.name.as_str(), &r.path, r.view, options))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    /// The compiled-in news table: `/` and `/article/:id`.
    pub fn news() -> Self {
        Self::from_config(&default_routes(), MatchOptions::default())
            .expect("built-in route table is valid")
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First route whose pattern matches the path.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path)
                .map(|params| RouteMatch { entry, params })
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Path for a named route (without any history base).
    pub fn href(&self, name: &str, params: &Params) -> Result<String> {
        let entry = self
            .by_name(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        entry.pattern.build(&entry.name, params)
    }

    /// Resolve a location, applying the not-found policy when nothing matches.
    pub fn resolve(&self, location: &Location, policy: &NotFoundPolicy) -> Result<Resolution> {
        if let Some(route) = self.activate(location) {
            return Ok(Resolution::Matched { route });
        }

        match policy {
            NotFoundPolicy::Render => Ok(Resolution::NotFound {
                route: ActiveRoute {
                    name: None,
                    view: View::NotFound,
                    params: Params::new(),
                    location: location.clone(),
                },
            }),
            NotFoundPolicy::Redirect { to } => {
                let target = Location::parse(to);
                let route = self
                    .activate(&target)
                    .ok_or_else(|| RouteError::RedirectUnresolved(to.clone()))?;
                Ok(Resolution::Redirect {
                    from: location.clone(),
                    route,
                })
            }
            NotFoundPolicy::Reject => Err(RouteError::NoMatch {
                path: location.path.clone(),
            }),
        }
    }

    fn activate(&self, location: &Location) -> Option<ActiveRoute> {
        self.lookup(&location.path).map(|m| ActiveRoute {
            name: Some(m.entry.name.clone()),
            view: m.entry.view,
            params: m.params,
            location: location.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, path: &str, view: View) -> RouteEntry {
        RouteEntry::new(name, path, view, MatchOptions::default()).unwrap()
    }

    #[test]
    fn test_news_table_lookup() {
        let table = RouteTable::news();
        assert_eq!(table.len(), 2);

        let m = table.lookup("/").unwrap();
        assert_eq!(m.entry.name(), "NewsFeed");
        assert!(m.params.is_empty());

        let m = table.lookup("/article/42").unwrap();
        assert_eq!(m.entry.name(), "ArticleDetail");
        assert_eq!(m.entry.view(), View::ArticleDetail);
        assert_eq!(m.params.get("id"), Some("42"));

        assert!(table.lookup("/nonexistent").is_none());
    }

    #[test]
    fn test_href() {
        let table = RouteTable::news();
        let params = Params::new().with("id", "7");
        assert_eq!(table.href("ArticleDetail", &params).unwrap(), "/article/7");
        assert_eq!(table.href("NewsFeed", &Params::new()).unwrap(), "/");
        assert_eq!(
            table.href("Missing", &Params::new()).unwrap_err(),
            RouteError::UnknownRoute("Missing".into())
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = RouteTable::new(vec![
            entry("NewsFeed", "/", View::NewsFeed),
            entry("NewsFeed", "/feed", View::NewsFeed),
        ])
        .unwrap_err();
        assert_eq!(err, RouteError::DuplicateName("NewsFeed".into()));
    }

    #[test]
    fn test_ambiguous_pattern_rejected() {
        let err = RouteTable::new(vec![
            entry("ArticleDetail", "/article/:id", View::ArticleDetail),
            entry("ArticleBySlug", "/article/:slug", View::ArticleDetail),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::AmbiguousPattern { .. }));
    }

    #[test]
    fn test_not_found_view_reserved() {
        let err = RouteEntry::new("Missing", "/404", View::NotFound, MatchOptions::default())
            .unwrap_err();
        assert_eq!(err, RouteError::ReservedView("Missing".into()));
    }

    #[test]
    fn test_resolve_policies() {
        let table = RouteTable::news();
        let missing = Location::parse("/nonexistent?x=1");

        let render = table.resolve(&missing, &NotFoundPolicy::Render).unwrap();
        assert!(matches!(render, Resolution::NotFound { .. }));
        assert_eq!(render.route().view, View::NotFound);
        assert_eq!(render.route().name, None);
        assert_eq!(render.route().location, missing);

        let redirect = table
            .resolve(&missing, &NotFoundPolicy::Redirect { to: "/".into() })
            .unwrap();
        assert!(matches!(redirect, Resolution::Redirect { .. }));
        assert_eq!(redirect.route().name.as_deref(), Some("NewsFeed"));
        assert_eq!(redirect.route().location.path, "/");

        let reject = table.resolve(&missing, &NotFoundPolicy::Reject).unwrap_err();
        assert_eq!(reject, RouteError::NoMatch { path: "/nonexistent".into() });

        let bad_target = table
            .resolve(&missing, &NotFoundPolicy::Redirect { to: "/gone".into() })
            .unwrap_err();
        assert_eq!(bad_target, RouteError::RedirectUnresolved("/gone".into()));
    }

    #[test]
    fn test_first_match_wins_order() {
        let table = RouteTable::new(vec![
            entry("Feed", "/", View::NewsFeed),
            entry("Article", "/article/:id", View::ArticleDetail),
            entry("Archive", "/archive/:year", View::NewsFeed),
        ])
        .unwrap();
        let m = table.lookup("/archive/2024").unwrap();
        assert_eq!(m.entry.name(), "Archive");
        assert_eq!(m.params.get("year"), Some("2024"));
    }
}
