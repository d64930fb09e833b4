//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from the validated configuration
//! - Build the server (compiles the route table)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use tokio::net::TcpListener;

use crate::config::RouterConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};

/// Run the server for a validated configuration until a shutdown signal.
pub async fn launch(config: RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base = %config.history.base,
        routes = config.routes.len(),
        not_found = ?config.not_found,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::wait_for_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
