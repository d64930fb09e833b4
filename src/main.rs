//! News router server.
//!
//! Serves the news reader's single-page application with path-based
//! history: every URL that resolves to a route gets the application
//! shell, so `/article/42` works on reload and as a shared link.
//!
//! ```text
//!     Browser request
//!         │
//!         ▼
//!   ┌──────────────┐     ┌──────────────┐     ┌────────────────────┐
//!   │ request ID + │────▶│  /_router/*  │────▶│ route table (JSON) │
//!   │   tracing    │     └──────────────┘     └────────────────────┘
//!   │              │     ┌──────────────┐
//!   │              │────▶│  /assets/*   │────▶ build output
//!   │              │     └──────────────┘
//!   │              │     ┌──────────────┐     ┌────────────────────┐
//!   │              │────▶│   fallback   │────▶│ resolve + not-found│──▶ shell / 307 / 404
//!   └──────────────┘     └──────────────┘     └────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use news_router::config::loader::load_or_default;
use news_router::lifecycle::startup;

#[derive(Parser)]
#[command(name = "news-router")]
#[command(about = "Serve the news reader with history-mode routing", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    startup::launch(config).await
}
