//! JSON introspection API under `/_router`.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::server::AppState;
use crate::routing::location::join_base;
use crate::routing::{Location, Params, Resolution, RouteError, View};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
    pub view: View,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HrefResponse {
    pub href: String,
}

#[derive(Deserialize)]
pub struct ResolveQuery {
    path: Option<String>,
}

/// Errors returned by the API as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing query parameter `{0}`")]
    MissingQuery(&'static str),
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Route(RouteError::NoMatch { .. } | RouteError::UnknownRoute(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Route(RouteError::MissingParam { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Route(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::debug!(status = %status, error = %self, "API error");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: state.table.len(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteInfo>> {
    let routes = state
        .table
        .entries()
        .iter()
        .map(|entry| RouteInfo {
            name: entry.name().to_string(),
            path: entry.path().to_string(),
            view: entry.view(),
        })
        .collect();
    Json(routes)
}

/// Resolve `?path=` the way a client-side navigation would.
pub async fn get_resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<Resolution>, ApiError> {
    let path = query.path.ok_or(ApiError::MissingQuery("path"))?;
    let resolution = state
        .table
        .resolve(&Location::parse(&path), &state.not_found)?;
    Ok(Json(resolution))
}

/// Reverse `?name=` plus the remaining query pairs as route parameters.
pub async fn get_href(
    State(state): State<AppState>,
    Query(mut query): Query<BTreeMap<String, String>>,
) -> Result<Json<HrefResponse>, ApiError> {
    let name = query.remove("name").ok_or(ApiError::MissingQuery("name"))?;
    let params: Params = query.into_iter().collect();
    let path = state.table.href(&name, &params)?;
    Ok(Json(HrefResponse {
        href: join_base(&state.base, &path),
    }))
}
