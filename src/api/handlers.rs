//! Match, event and player endpoints

use super::error::ApiError;
use crate::rating::MAX_RATING;
use crate::service::AppState;
use crate::stats::parse_assist_id;
use crate::types::{Event, EventKind, MatchBundle, NewEvent, Player, PlayerId};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Convert a failure into an API error, counting storage failures
fn fail(state: &AppState, operation: &str, err: anyhow::Error) -> ApiError {
    let api_error = ApiError::from(err);
    if matches!(api_error, ApiError::Internal(_)) {
        state.metrics().record_storage_error(operation);
    }
    api_error
}

/// Count the players sitting at the rating cap
fn update_capped_players(state: &AppState, players: &[Player]) {
    let capped = players
        .iter()
        .filter(|p| p.form_rating >= MAX_RATING)
        .count();
    state.metrics().set_players_at_max_rating(capped);
}

/// GET /api/match -> { match, players, events }
pub async fn get_match_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatchBundle>, ApiError> {
    let timer = state.metrics().start_timer();
    debug!("Fetching match bundle");

    let result = fetch_match_bundle(&state);
    state.metrics().record_request("fetch_match", timer.stop());

    result.map(Json)
}

fn fetch_match_bundle(state: &AppState) -> Result<MatchBundle, ApiError> {
    let current_match = state
        .matches()
        .current_match()
        .map_err(|e| fail(state, "fetch_match", e))?;
    let players = state
        .players()
        .list_players()
        .map_err(|e| fail(state, "fetch_match", e))?;
    let events = state
        .events()
        .list_events()
        .map_err(|e| fail(state, "fetch_match", e))?;

    update_capped_players(state, &players);

    Ok(MatchBundle {
        current_match,
        players,
        events,
    })
}

/// POST /api/event -> store the event, then update player stats and ratings
pub async fn add_event(
    State(state): State<Arc<AppState>>,
    Json(new_event): Json<NewEvent>,
) -> Result<Json<Event>, ApiError> {
    let timer = state.metrics().start_timer();

    let result = create_event(&state, new_event);
    state.metrics().record_request("create_event", timer.stop());

    result.map(Json)
}

fn create_event(state: &AppState, new_event: NewEvent) -> Result<Event, ApiError> {
    let kind = EventKind::classify(&new_event.kind);

    // Reject a malformed assistId before anything is written
    if kind == EventKind::Goal {
        parse_assist_id(&new_event.meta).map_err(|e| fail(state, "create_event", e))?;
    }

    let saved = state
        .events()
        .save_event(new_event)
        .map_err(|e| fail(state, "create_event", e))?;

    let changes = state
        .stat_updater()
        .update_stats_for(&saved)
        .map_err(|e| fail(state, "create_event", e))?;

    info!(
        "Recorded event {} ({} at minute {}, player {}), {} player(s) updated",
        saved.id,
        saved.kind,
        saved.minute,
        saved.player_id,
        changes.len()
    );

    state.metrics().record_event(kind, &changes);
    if !changes.is_empty() {
        match state.players().list_players() {
            Ok(players) => update_capped_players(state, &players),
            Err(e) => warn!("Could not refresh capped player count: {:#}", e),
        }
    }

    Ok(saved)
}

/// GET /api/player/{id} -> the player, or null when unknown
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlayerId>,
) -> Result<Json<Option<Player>>, ApiError> {
    let timer = state.metrics().start_timer();

    let result = state
        .players()
        .get_player(id)
        .map_err(|e| fail(&state, "fetch_player", e));
    state.metrics().record_request("fetch_player", timer.stop());

    let player = result?;
    if player.is_none() {
        debug!("Player {} not found", id);
    }

    Ok(Json(player))
}
