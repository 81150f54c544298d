//! REST API for the front end
//!
//! Routes:
//! - `GET /api/match` - current match, all players and all events
//! - `POST /api/event` - record an event and update player stats
//! - `GET /api/player/{id}` - a single player, or `null`
//! - `GET /health`, `GET /metrics` - monitoring

pub mod error;
pub mod handlers;
pub mod health;

pub use error::ApiError;

use crate::service::AppState;
use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Create the Axum router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        .route("/api/match", get(handlers::get_match_data))
        .route("/api/event", post(handlers::add_event))
        .route("/api/player/{id}", get(handlers::get_player))
        .layer(middleware::from_fn(allow_any_origin))
        .with_state(state)
}

/// Any origin may call the API. Preflight requests are answered directly.
async fn allow_any_origin(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );

    response
}
