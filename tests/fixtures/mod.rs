//! Test fixtures for API-level integration testing

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use match_analytics::api::build_router;
use match_analytics::config::{AppConfig, StorageBackend};
use match_analytics::service::AppState;
use match_analytics::storage::Repositories;
use match_analytics::types::{Match, Player};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const P1: i64 = 1;
pub const P2: i64 = 2;
pub const P3: i64 = 3;

/// Configuration that keeps everything in memory and skips seeding
pub fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.storage.seed_demo_data = false;
    config
}

/// A match between the two fixture teams
pub fn fixture_match() -> Match {
    Match {
        id: 1,
        date: "2025-09-14T18:00:00Z".parse().unwrap(),
        home_team: "Blue FC".to_string(),
        away_team: "Red United".to_string(),
        home_score: 0,
        away_score: 0,
    }
}

/// Three fresh players: two for the home side, one for the away side
pub fn fixture_players() -> Vec<Player> {
    vec![
        Player::new(P1, "Alex Carter", "Blue FC", Some("FW".to_string())),
        Player::new(P2, "Sam Okafor", "Blue FC", Some("MF".to_string())),
        Player::new(P3, "Jordan Reyes", "Red United", None),
    ]
}

/// Repositories preloaded with the fixture match and players
pub fn seeded_repositories() -> Repositories {
    let repos = Repositories::in_memory();
    repos.matches.save_match(fixture_match()).unwrap();
    for player in fixture_players() {
        repos.players.save_player(player).unwrap();
    }
    repos
}

/// Application state and router over the given repositories
pub fn create_test_app(repos: Repositories) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::with_repositories(memory_config(), repos).unwrap());
    let router = build_router(state.clone());
    (state, router)
}

/// Send a GET request and decode the JSON body
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Send a JSON POST request and decode the JSON body
pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Fetch the Prometheus text exposition
pub async fn metrics_text(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
