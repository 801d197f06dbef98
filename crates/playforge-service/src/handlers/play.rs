//! Play-time tracking and game content serving.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use playforge_core::{Game, GameId};
use playforge_store::Store;

use crate::auth::AuthUser;
use crate::content;
use crate::error::ApiError;
use crate::state::AppState;

/// Play-time report request.
#[derive(Debug, Deserialize)]
pub struct PlayTimeRequest {
    /// The game that was played.
    pub game_id: String,
    /// Seconds played since the last report. Must be positive.
    pub seconds_played: i64,
}

/// Record play time for the current user.
pub async fn record_time(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PlayTimeRequest>,
) -> Result<StatusCode, ApiError> {
    if body.seconds_played <= 0 {
        return Err(ApiError::BadRequest("seconds_played must be positive".into()));
    }
    let game_id = body
        .game_id
        .parse::<GameId>()
        .map_err(|_| ApiError::BadRequest("invalid game id".into()))?;

    if state.store.get_game(game_id)?.is_none() {
        return Err(ApiError::NotFound("game not found".into()));
    }

    let record = state
        .store
        .record_play_time(auth.user_id, game_id, body.seconds_played)?;

    tracing::debug!(
        user_id = %auth.user_id,
        game = %game_id,
        total_seconds = record.seconds_played,
        "Play time recorded"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// One game's accumulated play time, reported in rounded minutes.
#[derive(Debug, Serialize)]
pub struct PlayTimeResponse {
    /// The game.
    pub game_id: String,
    /// Game title, if the game still exists.
    pub game_title: Option<String>,
    /// Total play time in rounded minutes.
    pub minutes_played: i64,
    /// When the game was last played.
    pub last_played: String,
}

/// List the current user's play time across games.
pub async fn my_play_time(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<PlayTimeResponse>>, ApiError> {
    let records = state.store.list_play_records(auth.user_id)?;

    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let game_title = state.store.get_game(record.game_id)?.map(|g| g.name);
        out.push(PlayTimeResponse {
            game_id: record.game_id.to_string(),
            game_title,
            minutes_played: record.minutes_played(),
            last_played: record.last_played.to_rfc3339(),
        });
    }

    Ok(Json(out))
}

/// Serve a file from a game's staged content.
///
/// The caller must own the game or be its creator (or an admin). On first
/// access the game's uploaded content is staged into the serving cache
/// under a per-game lock; concurrent requests for a still-staging game wait
/// rather than racing on the filesystem.
pub async fn serve_content(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((game_id, file_path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let game_id = game_id
        .parse::<GameId>()
        .map_err(|_| ApiError::BadRequest("invalid game id".into()))?;

    let game = state
        .store
        .get_game(game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    let user = state
        .store
        .get_user(auth.user_id)?
        .ok_or(ApiError::Unauthorized)?;
    if !user.owns(game_id) && game.created_by != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden("game not owned".into()));
    }

    let serve_root = PathBuf::from(&state.config.serve_dir).join(game_id.to_string());
    if !serve_root.is_dir() {
        stage_game(&state, &game, &serve_root).await?;
    }

    let file = content::resolve_within(&serve_root, &file_path)
        .ok_or_else(|| ApiError::NotFound("file not found".into()))?;
    let bytes = tokio::fs::read(&file)
        .await
        .map_err(|e| ApiError::Internal(format!("content read failed: {e}")))?;
    let content_type = content::content_type_for(&file);

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Stage a game's uploaded content into the serving cache.
async fn stage_game(state: &AppState, game: &Game, serve_root: &std::path::Path) -> Result<(), ApiError> {
    let lock = state.content_locks.acquire(game.id);
    let _guard = lock.lock().await;

    // Another request may have finished staging while we waited.
    if serve_root.is_dir() {
        return Ok(());
    }

    let source = PathBuf::from(&state.config.content_dir).join(
        game.archive_file
            .clone()
            .unwrap_or_else(|| game.id.to_string()),
    );
    if !source.is_dir() {
        return Err(ApiError::NotFound("game content not uploaded".into()));
    }

    let dst = serve_root.to_path_buf();
    tokio::task::spawn_blocking(move || content::copy_dir_recursive(&source, &dst))
        .await
        .map_err(|e| ApiError::Internal(format!("staging task failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("content staging failed: {e}")))?;

    tracing::info!(game = %game.id, "Game content staged");
    Ok(())
}
