//! Client-side route table, history and router for the news reader.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ActiveRoute, NavigationOutcome, NavigationTarget, Router, RouteTable, View};
