//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → middleware.rs (request metrics)
//!     → /_router/* → api.rs (JSON introspection of the route table)
//!     → anything else → response.rs (history fallback: shell, redirect or 404)
//! ```

pub mod api;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
