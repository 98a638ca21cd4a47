//! HTTP services for the Ludus backend.

pub mod metrics_api;
pub mod student_api;

#[cfg(test)]
mod metrics_api_tests;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::auth::ApiSecret;
use crate::sessions::SessionTracker;
use crate::storage::{DatabaseError, GameDatabase};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: GameDatabase,
    pub sessions: SessionTracker,
    pub secret: ApiSecret,
}

impl AppState {
    pub fn new(db: GameDatabase, sessions: SessionTracker, secret: ApiSecret) -> Self {
        Self {
            db,
            sessions,
            secret,
        }
    }
}

/// Build the application router.
///
/// The CORS layer is permissive: the browser frontend runs on a separate
/// origin and all mutating endpoints are gated by the shared secret.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greet))
        .route("/login", post(student_api::login))
        .route("/logout", post(student_api::logout))
        .route("/signup", post(student_api::signup))
        .route("/metrics/reset", post(metrics_api::reset_metrics))
        .route("/metrics/{stoken}", get(metrics_api::get_metrics))
        .route("/game-attempt", post(metrics_api::log_game_attempt))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn greet() -> Json<serde_json::Value> {
    Json(json!({ "message": "Ludus says hello!" }))
}

/// Out-of-band request failures.
///
/// Auth, validation, and session-state failures are NOT errors at this
/// level: those ride in-band as the `error` field of a 200 response, which
/// is the contract the frontend inspects. This type covers the rest:
/// missing rows map to 404 and storage faults to 500, both with a JSON
/// `{detail}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            Self::Database(e) => {
                error!(error = %e, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
