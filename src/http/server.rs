//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile the route table shared by every handler
//! - Create Axum Router with the API, assets and history fallback
//! - Wire up middleware (request ID, tracing, metrics, timeout)
//! - Serve until the shutdown signal fires

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{NotFoundPolicy, RouterConfig};
use crate::http::middleware::track_requests;
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::http::response::{spa_fallback, Shell};
use crate::http::api;
use crate::routing::location::normalize_base;
use crate::routing::{RouteError, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub not_found: NotFoundPolicy,
    /// Normalized history base (empty for `/`).
    pub base: String,
    pub shell: Shell,
}

/// Errors raised while building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Route table error: {0}")]
    Routes(#[from] RouteError),

    #[error("Failed to read application shell {path}: {source}")]
    Shell {
        path: String,
        source: std::io::Error,
    },
}

/// HTTP server for the single-page application.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Result<Self, ServerError> {
        let table = Arc::new(RouteTable::from_config(&config.routes, config.matching)?);
        let base = normalize_base(&config.history.base);

        let shell = match &config.assets.dir {
            Some(dir) => Shell::load(Path::new(dir), &config.assets.index).map_err(|source| {
                ServerError::Shell {
                    path: Path::new(dir).join(&config.assets.index).display().to_string(),
                    source,
                }
            })?,
            None => Shell::builtin(&base),
        };

        let state = AppState {
            table,
            not_found: config.not_found.clone(),
            base,
            shell,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/status", get(api::get_status))
            .route("/routes", get(api::get_routes))
            .route("/resolve", get(api::get_resolve))
            .route("/href", get(api::get_href));

        let mut router = Router::new().nest("/_router", api);
        if let Some(dir) = &config.assets.dir {
            router = router.nest_service(
                &format!("{}/assets", state.base),
                ServeDir::new(Path::new(dir).join("assets")),
            );
        }

        router
            .fallback(spa_fallback)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn(track_requests))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The Axum router, for serving on a custom transport or in tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
