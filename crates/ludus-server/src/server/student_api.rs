//! Student account endpoints: login, logout, signup.
//!
//! All three are mutating and require the shared `auth_token`. Failures the
//! frontend is expected to handle (bad secret, ambiguous credentials,
//! session-state conflicts) come back as HTTP 200 with the `error` field
//! set and `response` null; only storage faults escape as 5xx.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub auth_token: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    pub response: Option<String>,
    pub error: Option<String>,
    pub stoken: Option<String>,
}

impl LoginResponse {
    fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub auth_token: String,
    pub email: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub response: Option<String>,
    pub error: Option<String>,
}

impl LogoutResponse {
    fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub auth_token: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupResponse {
    pub response: Option<String>,
    pub error: Option<String>,
    pub stoken: Option<String>,
}

impl SignupResponse {
    fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Log a student in by exact email+password match.
#[instrument(skip(state, req), fields(endpoint = "login"))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !state.secret.verify(&req.auth_token) {
        warn!("Rejected login with invalid auth token");
        return Ok(Json(LoginResponse::error("Auth token invalid.")));
    }

    let mut matches = state
        .db
        .find_students_by_credentials(&req.email, &req.password)
        .await?;

    // Zero matches means bad credentials; more than one means duplicate
    // emails have made the account ambiguous. Both refuse login.
    if matches.len() != 1 {
        return Ok(Json(LoginResponse::error(format!(
            "No unique student found for {}",
            req.email
        ))));
    }
    let student = matches.remove(0);

    if !state.sessions.begin(&req.email).await {
        return Ok(Json(LoginResponse::error("Student already logged in.")));
    }

    info!(email = %req.email, "Student logged in");

    Ok(Json(LoginResponse {
        response: Some(format!("Student {} logged in.", req.email)),
        error: None,
        stoken: Some(student.token),
    }))
}

/// Log a student out, ending their in-memory session.
#[instrument(skip(state, req), fields(endpoint = "logout"))]
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Json<LogoutResponse> {
    if !state.secret.verify(&req.auth_token) {
        warn!("Rejected logout with invalid auth token");
        return Json(LogoutResponse::error("Auth token invalid."));
    }

    if !state.sessions.end(&req.email).await {
        return Json(LogoutResponse::error(format!(
            "Student with email {} not logged in.",
            req.email
        )));
    }

    info!(email = %req.email, "Student logged out");

    Json(LogoutResponse {
        response: Some(format!("Student with email {} logged out.", req.email)),
        error: None,
    })
}

/// Register a new student, issue their stoken, and log them in.
#[instrument(skip(state, req), fields(endpoint = "signup"))]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    if !state.secret.verify(&req.auth_token) {
        warn!("Rejected signup with invalid auth token");
        return Ok(Json(SignupResponse::error("Auth token invalid.")));
    }

    // Duplicates are keyed on the full (name, email, password) triple, so a
    // re-signup with the same email but a different password is admitted.
    if state
        .db
        .student_exists(&req.name, &req.email, &req.password)
        .await?
    {
        return Ok(Json(SignupResponse::error(format!(
            "Student already exists with {}.",
            req.email
        ))));
    }

    let stoken = Uuid::new_v4().to_string();
    state
        .db
        .create_student(&stoken, &req.name, &req.email, &req.password)
        .await?;

    // Signing up counts as logging in. If a duplicate-email account already
    // holds the session slot this is a no-op.
    state.sessions.begin(&req.email).await;

    info!(email = %req.email, "Student signed up");

    Ok(Json(SignupResponse {
        response: Some(format!("Student with email {} signed up.", req.email)),
        error: None,
        stoken: Some(stoken),
    }))
}
