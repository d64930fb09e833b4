//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every route pattern and detect duplicate or ambiguous routes
//! - Check the not-found redirect target resolves to a route and can be
//!   sent as a `Location` header
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{NotFoundPolicy, RouterConfig};
use crate::routing::location::{join_base, normalize_base};
use crate::routing::{Location, RouteEntry, RouteError, RouteTable};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("At least one route is required")]
    NoRoutes,

    #[error("{0}")]
    Route(#[from] RouteError),

    #[error("History base {0:?} must start with '/'")]
    InvalidBase(String),

    #[error("Not-found redirect target {0:?} is not a valid Location header")]
    InvalidRedirect(String),

    #[error("Invalid {field} {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut entries = Vec::new();
    for route in &config.routes {
        match RouteEntry::new(route.name.as_str(), &route.path, route.view, config.matching) {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(e.into()),
        }
    }

    let mut table_ok = entries.len() == config.routes.len();
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if a.name() == b.name() {
                errors.push(RouteError::DuplicateName(b.name().to_string()).into());
                table_ok = false;
            } else if a.pattern().overlaps(b.pattern()) {
                errors.push(
                    RouteError::AmbiguousPattern {
                        first: a.name().to_string(),
                        first_path: a.path().to_string(),
                        second: b.name().to_string(),
                        second_path: b.path().to_string(),
                    }
                    .into(),
                );
                table_ok = false;
            }
        }
    }

    if let NotFoundPolicy::Redirect { to } = &config.not_found {
        if table_ok {
            if let Ok(table) = RouteTable::new(entries) {
                if table.lookup(&Location::parse(to).path).is_none() {
                    errors.push(RouteError::RedirectUnresolved(to.clone()).into());
                }
            }
        }

        let href = join_base(
            &normalize_base(&config.history.base),
            &Location::parse(to).full_path(),
        );
        if HeaderValue::from_str(&href).is_err() {
            errors.push(ValidationError::InvalidRedirect(to.clone()));
        }
    }

    if !config.history.base.starts_with('/') {
        errors.push(ValidationError::InvalidBase(config.history.base.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
