//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Own the active route and the history stack
//! - Turn navigation requests (path or named route) into locations
//! - Resolve locations against the table and activate the result
//! - Notify subscribers when the active route changes
//!
//! # Design Decisions
//! - One explicit instance owned by the application root, no globals
//! - Navigation is synchronous on `&mut self`; no locks
//! - Navigating to the current location is a no-op (`Duplicated`)
//! - A rejected navigation leaves history and the active route untouched

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::config::schema::{NotFoundPolicy, RouterConfig};
use crate::observability::metrics;
use crate::routing::error::Result;
use crate::routing::history::{History, MemoryHistory};
use crate::routing::location::Location;
use crate::routing::table::{Resolution, RouteTable};
use crate::routing::view::{Params, View};

/// The route currently driving the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveRoute {
    /// Route name; `None` when the not-found view is active.
    pub name: Option<String>,
    pub view: View,
    pub params: Params,
    pub location: Location,
}

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A base-relative path, optionally with query and hash.
    Path(String),
    /// A named route plus the parameters its pattern needs.
    Named {
        name: String,
        params: Params,
        query: Vec<(String, String)>,
        hash: Option<String>,
    },
}

impl NavigationTarget {
    pub fn path(path: impl Into<String>) -> Self {
        NavigationTarget::Path(path.into())
    }

    pub fn named(name: impl Into<String>, params: Params) -> Self {
        NavigationTarget::Named {
            name: name.into(),
            params,
            query: Vec::new(),
            hash: None,
        }
    }

    /// Attach a query to a named target. Path targets carry their own.
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        if let NavigationTarget::Named { query, .. } = &mut self {
            *query = pairs;
        }
        self
    }

    /// Attach a hash to a named target. Path targets carry their own.
    pub fn with_hash(mut self, fragment: impl Into<String>) -> Self {
        if let NavigationTarget::Named { hash, .. } = &mut self {
            *hash = Some(fragment.into());
        }
        self
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

/// What a navigation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// A new route is active.
    Navigated,
    /// The target was already active; nothing changed.
    Duplicated,
    /// Nothing matched and the not-found policy redirected.
    Redirected,
}

impl NavigationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationOutcome::Navigated => "navigated",
            NavigationOutcome::Duplicated => "duplicated",
            NavigationOutcome::Redirected => "redirected",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Push,
    Replace,
}

/// Router instance: route table, history and the active route.
#[derive(Debug)]
pub struct Router<H: History = MemoryHistory> {
    table: Arc<RouteTable>,
    history: H,
    not_found: NotFoundPolicy,
    current: ActiveRoute,
    tx: watch::Sender<ActiveRoute>,
}

impl Router<MemoryHistory> {
    /// Router over a fresh in-memory history, built from configuration.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let table = Arc::new(RouteTable::from_config(&config.routes, config.matching)?);
        let history = MemoryHistory::with_base(&config.history.base, Location::new("/"));
        Self::new(table, history, config.not_found.clone())
    }
}

impl<H: History> Router<H> {
    /// Create a router and perform the initial navigation to the history's
    /// current location.
    pub fn new(table: Arc<RouteTable>, mut history: H, not_found: NotFoundPolicy) -> Result<Self> {
        let start = history.location().clone();
        let resolution = table.resolve(&start, &not_found)?;
        if let Resolution::Redirect { route, .. } = &resolution {
            history.replace(route.location.clone());
        }
        let current = resolution.into_route();

        tracing::debug!(
            route = route_label(&current),
            path = %current.location.path,
            "Initial navigation"
        );

        let (tx, _) = watch::channel(current.clone());
        Ok(Self {
            table,
            history,
            not_found,
            current,
            tx,
        })
    }

    /// The active route.
    pub fn current(&self) -> &ActiveRoute {
        &self.current
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Receive the active route whenever it changes.
    pub fn subscribe(&self) -> watch::Receiver<ActiveRoute> {
        self.tx.subscribe()
    }

    /// The location a target points at, without resolving it.
    pub fn location_for(&self, target: &NavigationTarget) -> Result<Location> {
        match target {
            NavigationTarget::Path(path) => Ok(Location::parse(path)),
            NavigationTarget::Named {
                name,
                params,
                query,
                hash,
            } => {
                let path = self.table.href(name, params)?;
                Ok(Location::new(path)
                    .with_query(query.clone())
                    .with_hash(hash.clone()))
            }
        }
    }

    /// Resolve a target without navigating.
    pub fn resolve(&self, target: &NavigationTarget) -> Result<Resolution> {
        let location = self.location_for(target)?;
        self.table.resolve(&location, &self.not_found)
    }

    /// Base-prefixed href for a target.
    pub fn href(&self, target: &NavigationTarget) -> Result<String> {
        let location = self.location_for(target)?;
        Ok(self.history.create_href(&location))
    }

    /// Navigate, adding a history entry.
    pub fn push(&mut self, target: impl Into<NavigationTarget>) -> Result<NavigationOutcome> {
        self.navigate(target.into(), Mode::Push)
    }

    /// Navigate, overwriting the current history entry.
    pub fn replace(&mut self, target: impl Into<NavigationTarget>) -> Result<NavigationOutcome> {
        self.navigate(target.into(), Mode::Replace)
    }

    /// Step one entry back. Returns `false` at the start of history.
    pub fn back(&mut self) -> Result<bool> {
        self.go(-1)
    }

    /// Step one entry forward. Returns `false` at the end of history.
    pub fn forward(&mut self) -> Result<bool> {
        self.go(1)
    }

    /// Traverse history by `delta` entries and activate what is there.
    pub fn go(&mut self, delta: isize) -> Result<bool> {
        let location = match self.history.go(delta) {
            Some(location) => location.clone(),
            None => return Ok(false),
        };

        let resolution = match self.table.resolve(&location, &self.not_found) {
            Ok(resolution) => resolution,
            Err(e) => {
                self.history.go(-delta);
                return Err(e);
            }
        };

        let outcome = match &resolution {
            Resolution::Redirect { route, .. } => {
                self.history.replace(route.location.clone());
                NavigationOutcome::Redirected
            }
            _ => NavigationOutcome::Navigated,
        };

        // `go(0)` or an entry identical to the active one: nothing changes.
        let route = resolution.into_route();
        if route.location == self.current.location {
            self.record(NavigationOutcome::Duplicated);
            return Ok(true);
        }
        self.activate(route, outcome);
        Ok(true)
    }

    fn navigate(&mut self, target: NavigationTarget, mode: Mode) -> Result<NavigationOutcome> {
        let location = self.location_for(&target)?;
        if location == self.current.location {
            self.record(NavigationOutcome::Duplicated);
            return Ok(NavigationOutcome::Duplicated);
        }

        let resolution = self.table.resolve(&location, &self.not_found).map_err(|e| {
            tracing::warn!(path = %location.path, error = %e, "Navigation rejected");
            e
        })?;

        let outcome = match resolution {
            Resolution::Redirect { .. } => NavigationOutcome::Redirected,
            _ => NavigationOutcome::Navigated,
        };
        let route = resolution.into_route();

        // A redirect can land on the location that is already active.
        if route.location == self.current.location {
            self.record(outcome);
            return Ok(outcome);
        }

        match mode {
            Mode::Push => self.history.push(route.location.clone()),
            Mode::Replace => self.history.replace(route.location.clone()),
        }
        self.activate(route, outcome);
        Ok(outcome)
    }

    fn activate(&mut self, route: ActiveRoute, outcome: NavigationOutcome) {
        tracing::debug!(
            route = route_label(&route),
            path = %route.location.path,
            outcome = outcome.as_str(),
            "Navigation"
        );
        self.current = route;
        self.record(outcome);
        self.tx.send_replace(self.current.clone());
    }

    fn record(&self, outcome: NavigationOutcome) {
        metrics::record_navigation(route_label(&self.current), outcome.as_str());
    }
}

fn route_label(route: &ActiveRoute) -> &str {
    route.name.as_deref().unwrap_or(View::NotFound.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::RouteError;

    fn router(policy: NotFoundPolicy) -> Router {
        Router::new(Arc::new(RouteTable::news()), MemoryHistory::new(), policy).unwrap()
    }

    #[test]
    fn test_initial_navigation() {
        let router = router(NotFoundPolicy::Render);
        assert_eq!(router.current().name.as_deref(), Some("NewsFeed"));
        assert_eq!(router.current().view, View::NewsFeed);
        assert!(router.current().params.is_empty());
    }

    #[test]
    fn test_push_path_binds_param() {
        let mut router = router(NotFoundPolicy::Render);
        let outcome = router.push("/article/42").unwrap();
        assert_eq!(outcome, NavigationOutcome::Navigated);
        assert_eq!(router.current().name.as_deref(), Some("ArticleDetail"));
        assert_eq!(router.current().params.get("id"), Some("42"));
        assert_eq!(router.history().len(), 2);
    }

    #[test]
    fn test_push_named() {
        let mut router = router(NotFoundPolicy::Render);
        let target = NavigationTarget::named("ArticleDetail", Params::new().with("id", "7"));
        router.push(target).unwrap();
        assert_eq!(router.current().location.path, "/article/7");
        assert_eq!(router.current().params.get("id"), Some("7"));
    }

    #[test]
    fn test_repeated_navigation_is_idempotent() {
        let mut router = router(NotFoundPolicy::Render);
        router.push("/article/42").unwrap();
        let before = router.current().clone();

        let outcome = router.push("/article/42").unwrap();
        assert_eq!(outcome, NavigationOutcome::Duplicated);
        assert_eq!(router.current(), &before);
        assert_eq!(router.history().len(), 2);
    }

    #[test]
    fn test_named_navigation_errors() {
        let mut router = router(NotFoundPolicy::Render);
        let err = router
            .push(NavigationTarget::named("ArticleDetail", Params::new()))
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingParam { .. }));

        let err = router
            .push(NavigationTarget::named("Settings", Params::new()))
            .unwrap_err();
        assert_eq!(err, RouteError::UnknownRoute("Settings".into()));
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn test_replace_does_not_grow_history() {
        let mut router = router(NotFoundPolicy::Render);
        router.replace("/article/3").unwrap();
        assert_eq!(router.history().len(), 1);
        assert_eq!(router.current().params.get("id"), Some("3"));
    }

    #[test]
    fn test_back_and_forward() {
        let mut router = router(NotFoundPolicy::Render);
        router.push("/article/1").unwrap();
        router.push("/article/2").unwrap();

        assert!(router.back().unwrap());
        assert_eq!(router.current().params.get("id"), Some("1"));
        assert!(router.back().unwrap());
        assert_eq!(router.current().name.as_deref(), Some("NewsFeed"));
        assert!(!router.back().unwrap());

        assert!(router.forward().unwrap());
        assert_eq!(router.current().params.get("id"), Some("1"));
        assert!(router.go(1).unwrap());
        assert_eq!(router.current().params.get("id"), Some("2"));
        assert!(!router.forward().unwrap());
    }

    #[test]
    fn test_traversal_onto_identical_entry_does_not_notify() {
        let mut router = router(NotFoundPolicy::Render);
        router.push("/article/1").unwrap();
        router.replace("/").unwrap();
        assert_eq!(router.history().len(), 2);

        let mut rx = router.subscribe();
        assert!(router.go(0).unwrap());
        assert!(router.back().unwrap());
        assert_eq!(router.history().position(), 0);
        assert_eq!(router.current().name.as_deref(), Some("NewsFeed"));
        assert!(!rx.has_changed().unwrap());

        assert!(router.forward().unwrap());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_subscribe_sees_changes() {
        let mut router = router(NotFoundPolicy::Render);
        let mut rx = router.subscribe();
        router.push("/article/5").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().params.get("id"), Some("5"));

        router.push("/article/5").unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_href_uses_base() {
        let table = Arc::new(RouteTable::news());
        let history = MemoryHistory::with_base("/news", Location::new("/"));
        let router = Router::new(table, history, NotFoundPolicy::Render).unwrap();
        let target = NavigationTarget::named("ArticleDetail", Params::new().with("id", "7"))
            .with_hash("comments");
        assert_eq!(router.href(&target).unwrap(), "/news/article/7#comments");
    }

    #[test]
    fn test_initial_redirect_replaces_entry() {
        let table = Arc::new(RouteTable::news());
        let history = MemoryHistory::starting_at(Location::parse("/missing"));
        let router =
            Router::new(table, history, NotFoundPolicy::Redirect { to: "/".into() }).unwrap();
        assert_eq!(router.current().name.as_deref(), Some("NewsFeed"));
        assert_eq!(router.history().location().path, "/");
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn test_initial_reject_fails() {
        let table = Arc::new(RouteTable::news());
        let history = MemoryHistory::starting_at(Location::parse("/missing"));
        let err = Router::new(table, history, NotFoundPolicy::Reject).unwrap_err();
        assert_eq!(err, RouteError::NoMatch { path: "/missing".into() });
    }
}
