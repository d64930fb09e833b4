//! Routing error definitions.

use thiserror::Error;

/// Errors produced while building the route table or navigating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No route matched the path and the not-found policy rejects it.
    #[error("No route matches path {path}")]
    NoMatch { path: String },

    /// Named navigation referenced a route that does not exist.
    #[error("Unknown route name: {0}")]
    UnknownRoute(String),

    /// Reverse routing was missing a parameter the pattern requires.
    #[error("Route {route} requires parameter `{param}`")]
    MissingParam { route: String, param: String },

    /// Pattern failed to compile.
    #[error("Invalid path pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Two routes share a name.
    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    /// Two patterns can match the same concrete path.
    #[error("Route {first} ({first_path}) is ambiguous with {second} ({second_path})")]
    AmbiguousPattern {
        first: String,
        first_path: String,
        second: String,
        second_path: String,
    },

    /// A table entry tried to claim a view reserved for the router.
    #[error("Route {0} cannot use the not_found view")]
    ReservedView(String),

    /// The not-found redirect target does not resolve to a route.
    #[error("Not-found redirect target {0} does not match any route")]
    RedirectUnresolved(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;
