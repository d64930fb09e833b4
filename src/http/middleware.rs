//! Request metrics middleware.
//!
//! Every request is counted once, here, whichever handler served it. The
//! history fallback tags its responses with a [`RouteLabel`]; API and asset
//! responses are labelled by where they were mounted.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::observability::metrics;

/// Metrics label attached to a response by the handler that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabel(pub String);

pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let label = request_label(&path, response.extensions().get::<RouteLabel>());
    metrics::record_request(label, response.status().as_u16(), start);
    response
}

/// Label for a finished request. Anything the fallback did not tag was
/// served by the API or the asset directory.
pub fn request_label<'a>(path: &str, tagged: Option<&'a RouteLabel>) -> &'a str {
    match tagged {
        Some(RouteLabel(label)) => label,
        None if path == "/_router" || path.starts_with("/_router/") => "api",
        None => "assets",
    }
}
