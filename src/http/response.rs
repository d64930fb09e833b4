//! History-mode fallback responses.
//!
//! # Responsibilities
//! - Serve the application shell for every path that resolves to a route,
//!   so deep links and reloads work with path-based history
//! - Apply the not-found policy on the server side as well
//!
//! # Design Decisions
//! - Paths outside the history base are plain 404s
//! - Route name and view travel in response headers for the shell
//! - Redirect targets are base-prefixed

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::http::middleware::RouteLabel;
use crate::http::server::AppState;
use crate::routing::location::{join_base, strip_base};
use crate::routing::{ActiveRoute, Location, Resolution};

pub const X_ROUTE_NAME: HeaderName = HeaderName::from_static("x-route-name");
pub const X_ROUTE_VIEW: HeaderName = HeaderName::from_static("x-route-view");

/// The HTML document the client-side application boots from.
#[derive(Debug, Clone)]
pub struct Shell(Arc<str>);

impl Shell {
    /// Read the shell from the build output.
    pub fn load(dir: &Path, index: &str) -> std::io::Result<Self> {
        let html = std::fs::read_to_string(dir.join(index))?;
        Ok(Self(html.into()))
    }

    /// Minimal shell used when no build output is configured. It is inert:
    /// without `assets.dir` there is no script to load, so it only carries
    /// the mount point and the base href.
    pub fn builtin(base: &str) -> Self {
        let html = format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
             <base href=\"{}/\">\n  <title>News</title>\n</head>\n<body>\n  \
             <div id=\"app\"></div>\n</body>\n</html>\n",
            base
        );
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fallback handler: everything that is not an API route or an asset.
///
/// Every response carries a [`RouteLabel`] for the request metrics layer.
pub async fn spa_fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return labelled(
            "method_not_allowed",
            (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response(),
        );
    }

    let Some(path) = strip_base(&state.base, uri.path()) else {
        tracing::debug!(path = %uri.path(), base = %state.base, "Outside history base");
        return labelled("outside_base", (StatusCode::NOT_FOUND, "Not found").into_response());
    };

    let location = match uri.query() {
        Some(query) => Location::parse(&format!("{}?{}", path, query)),
        None => Location::parse(path),
    };

    let (label, response) = match state.table.resolve(&location, &state.not_found) {
        Ok(Resolution::Matched { route }) => (
            route.name.clone().unwrap_or_default(),
            shell_response(StatusCode::OK, &state.shell, &route),
        ),
        Ok(Resolution::NotFound { route }) => (
            route.view.to_string(),
            shell_response(StatusCode::NOT_FOUND, &state.shell, &route),
        ),
        Ok(Resolution::Redirect { from, route }) => {
            let target = join_base(&state.base, &route.location.full_path());
            tracing::debug!(from = %from.path, to = %target, "Not-found redirect");
            ("redirect".to_string(), Redirect::temporary(&target).into_response())
        }
        Err(e) => {
            tracing::debug!(path = %location.path, error = %e, "No route matched");
            ("rejected".to_string(), (StatusCode::NOT_FOUND, e.to_string()).into_response())
        }
    };

    labelled(label, response)
}

fn labelled(label: impl Into<String>, mut response: Response) -> Response {
    response.extensions_mut().insert(RouteLabel(label.into()));
    response
}

fn shell_response(status: StatusCode, shell: &Shell, route: &ActiveRoute) -> Response {
    let mut response = (status, Html(shell.as_str().to_string())).into_response();
    let headers = response.headers_mut();
    if let Some(name) = route.name.as_deref() {
        if let Ok(value) = HeaderValue::from_str(name) {
            headers.insert(X_ROUTE_NAME, value);
        }
    }
    headers.insert(X_ROUTE_VIEW, HeaderValue::from_static(route.view.as_str()));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}
