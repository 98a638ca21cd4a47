//! Data models for Ludus storage.

use serde::{Deserialize, Serialize};

/// A student account. `token` is the server-generated stoken; `email` is the
/// key used for session tracking. Passwords are stored as received -- see
/// DESIGN.md for why they are not hashed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub token: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: i64,
}

/// Aggregate gameplay statistics for one student. `success_rate` is a
/// stored column generated from the two counters; `last_active` is NULL
/// until the first recorded attempt.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Metrics {
    pub token: String,
    pub total_games_attempted: i64,
    pub total_games_correct: i64,
    pub total_points_earned: i64,
    pub success_rate: Option<f64>,
    pub last_active: Option<i64>,
}

/// One append-only log entry per game attempt.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameAttempt {
    pub id: i64,
    pub token: String,
    pub gid: i64,
    pub attempted_at: i64,
    pub got_correct: i64,
}

/// Read-only catalog entry: how many points a correct attempt earns.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub gid: i64,
    pub name: String,
    pub correct_points: i64,
}
