//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{MatchOptions, View};

/// Route name of the feed listing.
pub const NEWS_FEED: &str = "NewsFeed";

/// Route name of the article detail view.
pub const ARTICLE_DETAIL: &str = "ArticleDetail";

/// Root configuration for the router and its server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// History settings (base path).
    pub history: HistoryConfig,

    /// Options applied to every route pattern.
    pub matching: MatchOptions,

    /// What happens when no route matches.
    pub not_found: NotFoundPolicy,

    /// Route table, evaluated top to bottom.
    pub routes: Vec<RouteConfig>,

    /// Built single-page application assets.
    pub assets: AssetsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            history: HistoryConfig::default(),
            matching: MatchOptions::default(),
            not_found: NotFoundPolicy::default(),
            routes: default_routes(),
            assets: AssetsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// The compiled-in route table: the feed and the article detail view.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            name: NEWS_FEED.to_string(),
            path: "/".to_string(),
            view: View::NewsFeed,
        },
        RouteConfig {
            name: ARTICLE_DETAIL.to_string(),
            path: "/article/:id".to_string(),
            view: View::ArticleDetail,
        },
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// History configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path prefix the application is mounted under (e.g., "/news").
    pub base: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
        }
    }
}

/// A single route entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Unique route name used for named navigation.
    pub name: String,

    /// Path pattern, e.g. "/article/:id".
    pub path: String,

    /// View activated by this route.
    pub view: View,
}

/// Behaviour for paths that match no route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum NotFoundPolicy {
    /// Activate the not-found view at the requested location.
    #[default]
    Render,

    /// Send the navigation to another path instead.
    Redirect {
        #[serde(default = "default_redirect_target")]
        to: String,
    },

    /// Refuse the navigation; the active route stays put.
    Reject,
}

fn default_redirect_target() -> String {
    "/".to_string()
}

/// Location of the built application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the build output. Unset serves a built-in shell.
    pub dir: Option<String>,

    /// Shell document inside `dir`.
    pub index: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            index: "index.html".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
