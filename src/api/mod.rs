//! REST API endpoints.
//!
//! Axum-based HTTP API serving the computed season report.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::store::StoreError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Season report has not been computed yet")]
    NotReady,

    #[error("Reload failed: {0}")]
    Reload(#[from] StoreError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY"),
            ApiError::Reload(_) => (StatusCode::BAD_GATEWAY, "RELOAD_FAILED"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// CORS for the configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST]),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            CorsLayer::new()
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/api/podiums", get(routes::stats::podiums))
        .route("/api/individual", get(routes::stats::individual))
        .route("/api/charts", get(routes::stats::charts))
        .route("/api/races", get(routes::stats::races))
        .route("/api/leaderboard", get(routes::stats::leaderboard))
        .route("/api/report", get(routes::stats::report))
        .route("/api/status", get(routes::status::status))
        .route("/api/refresh", post(routes::status::refresh))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
