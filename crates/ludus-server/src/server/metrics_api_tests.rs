//! Tests for the gameplay metrics endpoints.

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use crate::auth::ApiSecret;
use crate::sessions::SessionTracker;
use crate::storage::GameDatabase;

use super::metrics_api::{
    GameAttemptRequest, MetricsResponse, ResetQuery, get_metrics, log_game_attempt, reset_metrics,
};
use super::{ApiError, AppState, router};

const TEST_SECRET: &str = "test-secret";

async fn setup() -> AppState {
    let db = GameDatabase::open_in_memory().await.unwrap();
    AppState::new(db, SessionTracker::new(), ApiSecret::new(TEST_SECRET))
}

/// Create a student row directly in storage and return the stoken.
async fn seed_student(state: &AppState) -> String {
    state
        .db
        .create_student("tok-1", "Alice", "alice@example.com", "pqr")
        .await
        .unwrap();
    "tok-1".to_string()
}

fn attempt(stoken: &str, gid: i64, got_correct: bool) -> GameAttemptRequest {
    GameAttemptRequest {
        stoken: stoken.to_string(),
        gid,
        got_correct,
    }
}

// === Handler-level ===

#[tokio::test]
async fn get_metrics_for_unknown_token_is_not_found() {
    let state = setup().await;

    let err = get_metrics(State(state.clone()), Path("missing".to_string()))
        .await
        .unwrap_err();

    match err {
        ApiError::NotFound(detail) => {
            assert_eq!(detail, "Metrics not found for the provided student token.");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn correct_attempt_is_folded_into_metrics() {
    let state = setup().await;
    let stoken = seed_student(&state).await;

    let resp = log_game_attempt(State(state.clone()), Json(attempt(&stoken, 1, true)))
        .await
        .unwrap()
        .0;
    assert_eq!(
        resp.message,
        "Game attempt logged and metrics updated successfully"
    );

    let metrics = get_metrics(State(state.clone()), Path(stoken))
        .await
        .unwrap()
        .0;
    assert_eq!(metrics.total_games_attempted, 1);
    assert_eq!(metrics.total_games_correct, 1);
    assert!(metrics.total_points_earned > 0);
    assert!(metrics.last_active.is_some());
}

#[tokio::test]
async fn incorrect_attempt_earns_no_points() {
    let state = setup().await;
    let stoken = seed_student(&state).await;

    let _ = log_game_attempt(State(state.clone()), Json(attempt(&stoken, 1, false)))
        .await
        .unwrap();

    let metrics = get_metrics(State(state.clone()), Path(stoken))
        .await
        .unwrap()
        .0;
    assert_eq!(metrics.total_games_attempted, 1);
    assert_eq!(metrics.total_games_correct, 0);
    assert_eq!(metrics.total_points_earned, 0);
    assert!(metrics.last_active.is_some());
}

#[tokio::test]
async fn attempt_for_unknown_game_is_not_found_and_writes_nothing() {
    let state = setup().await;
    let stoken = seed_student(&state).await;

    let err = log_game_attempt(State(state.clone()), Json(attempt(&stoken, 999, true)))
        .await
        .unwrap_err();
    match err {
        ApiError::NotFound(detail) => assert_eq!(detail, "Game 999 not found."),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let metrics = get_metrics(State(state.clone()), Path(stoken))
        .await
        .unwrap()
        .0;
    assert_eq!(metrics.total_games_attempted, 0);
}

#[tokio::test]
async fn reset_zeroes_an_active_student() {
    let state = setup().await;
    let stoken = seed_student(&state).await;
    let _ = log_game_attempt(State(state.clone()), Json(attempt(&stoken, 2, true)))
        .await
        .unwrap();

    let resp = reset_metrics(
        State(state.clone()),
        Query(ResetQuery {
            stoken: stoken.clone(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(
        resp.message,
        format!("Metrics for student {stoken} reset successfully")
    );

    let metrics = get_metrics(State(state.clone()), Path(stoken))
        .await
        .unwrap()
        .0;
    assert_eq!(metrics.total_games_attempted, 0);
    assert_eq!(metrics.total_points_earned, 0);
    assert!(metrics.last_active.is_none());
}

#[tokio::test]
async fn reset_for_unknown_token_still_succeeds() {
    let state = setup().await;

    let resp = reset_metrics(
        State(state),
        Query(ResetQuery {
            stoken: "no-such-token".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(
        resp.message,
        "Metrics for student no-such-token reset successfully"
    );
}

// === Router-level ===

#[tokio::test]
async fn greeting_route_responds() {
    let state = setup().await;
    let app = router(state);

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_metrics_token_is_a_404_with_fixed_detail() {
    let state = setup().await;
    let app = router(state);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics/no-such-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value["detail"],
        "Metrics not found for the provided student token."
    );
}

#[tokio::test]
async fn metrics_roundtrip_over_the_wire() {
    let state = setup().await;
    let stoken = seed_student(&state).await;
    state
        .db
        .record_game_attempt(&stoken, 1, true)
        .await
        .unwrap();
    let app = router(state);

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/metrics/{stoken}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let metrics: MetricsResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(metrics.stoken, stoken);
    assert_eq!(metrics.total_games_attempted, 1);
    assert_eq!(metrics.success_rate, Some(1.0));
}

#[tokio::test]
async fn game_attempt_and_reset_over_the_wire() {
    let state = setup().await;
    let stoken = seed_student(&state).await;

    let attempt_req = Request::builder()
        .method("POST")
        .uri("/game-attempt")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({
                "stoken": stoken,
                "gid": 1,
                "got_correct": true,
            }))
            .unwrap(),
        ))
        .unwrap();
    let resp = router(state.clone()).oneshot(attempt_req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let reset_req = Request::builder()
        .method("POST")
        .uri(format!("/metrics/reset?stoken={stoken}"))
        .body(Body::empty())
        .unwrap();
    let resp = router(state.clone()).oneshot(reset_req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let metrics = state.db.get_metrics(&stoken).await.unwrap();
    assert_eq!(metrics.total_games_attempted, 0);
}
