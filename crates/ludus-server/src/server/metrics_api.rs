//! Gameplay metrics endpoints: read, attempt logging, reset.
//!
//! These identify the student by stoken alone; the game clients already
//! hold a stoken from signup.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::storage::{DatabaseError, Metrics};

use super::{ApiError, AppState};

/// Metrics as the frontend consumes them. Identical to the stored row
/// except that the token column is surfaced under its wire name `stoken`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub stoken: String,
    pub total_games_attempted: i64,
    pub total_games_correct: i64,
    pub total_points_earned: i64,
    pub success_rate: Option<f64>,
    pub last_active: Option<i64>,
}

impl From<Metrics> for MetricsResponse {
    fn from(m: Metrics) -> Self {
        Self {
            stoken: m.token,
            total_games_attempted: m.total_games_attempted,
            total_games_correct: m.total_games_correct,
            total_points_earned: m.total_points_earned,
            success_rate: m.success_rate,
            last_active: m.last_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GameAttemptRequest {
    pub stoken: String,
    pub gid: i64,
    pub got_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub stoken: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Fetch a student's metrics row by stoken.
#[instrument(skip(state), fields(endpoint = "get_metrics"))]
pub async fn get_metrics(
    State(state): State<AppState>,
    Path(stoken): Path<String>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state.db.get_metrics(&stoken).await.map_err(|e| match e {
        DatabaseError::NotFound(_) => {
            ApiError::NotFound("Metrics not found for the provided student token.".to_string())
        }
        other => ApiError::Database(other),
    })?;

    Ok(Json(MetricsResponse::from(metrics)))
}

/// Append an attempt to the log and fold it into the student's metrics,
/// atomically.
#[instrument(skip(state, req), fields(endpoint = "game_attempt"))]
pub async fn log_game_attempt(
    State(state): State<AppState>,
    Json(req): Json<GameAttemptRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .db
        .record_game_attempt(&req.stoken, req.gid, req.got_correct)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound(_) => {
                ApiError::NotFound(format!("Game {} not found.", req.gid))
            }
            other => ApiError::Database(other),
        })?;

    info!(stoken = %req.stoken, gid = req.gid, got_correct = req.got_correct, "Game attempt recorded");

    Ok(Json(MessageResponse {
        message: "Game attempt logged and metrics updated successfully".to_string(),
    }))
}

/// Zero a student's counters. Succeeds whether or not the stoken exists.
#[instrument(skip(state), fields(endpoint = "reset_metrics"))]
pub async fn reset_metrics(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.reset_metrics(&query.stoken).await?;

    info!(stoken = %query.stoken, "Metrics reset");

    Ok(Json(MessageResponse {
        message: format!("Metrics for student {} reset successfully", query.stoken),
    }))
}
