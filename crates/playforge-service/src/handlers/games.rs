//! Game catalog handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use playforge_core::{join_genres, parse_genres, recommend, Game, GameId, UserId};
use playforge_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Game response. Genres cross the HTTP boundary as the legacy
/// comma-joined string.
#[derive(Debug, Serialize)]
pub struct GameResponse {
    /// Game ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Store-page description.
    pub description: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Comma-joined genre tags.
    pub genres: String,
    /// Developer name.
    pub developer: String,
    /// Release date, if announced.
    pub release_date: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Cover image file reference.
    pub image_file: Option<String>,
    /// Archive file reference.
    pub archive_file: Option<String>,
    /// The publishing user.
    pub created_by: String,
    /// When the game was published.
    pub created_at: String,
    /// When the game was last updated.
    pub updated_at: String,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.to_string(),
            name: game.name.clone(),
            description: game.description.clone(),
            price_cents: game.price_cents,
            genres: join_genres(&game.genres),
            developer: game.developer.clone(),
            release_date: game.release_date.map(|d| d.to_rfc3339()),
            tags: game.tags.clone(),
            image_file: game.image_file.clone(),
            archive_file: game.archive_file.clone(),
            created_by: game.created_by.to_string(),
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
        }
    }
}

/// Game creation request. Genres arrive comma-joined.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// Display name.
    pub name: String,
    /// Store-page description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price in cents. Missing means free.
    #[serde(default)]
    pub price_cents: Option<i64>,
    /// Comma-joined genre tags.
    #[serde(default)]
    pub genres: Option<String>,
    /// Developer name.
    #[serde(default)]
    pub developer: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Cover image file reference.
    #[serde(default)]
    pub image_file: Option<String>,
    /// Archive file reference.
    #[serde(default)]
    pub archive_file: Option<String>,
}

/// Publish a new game; the caller becomes its seller.
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    let price_cents = body.price_cents.unwrap_or(0);
    if price_cents < 0 {
        return Err(ApiError::BadRequest("price must not be negative".into()));
    }

    let genres = parse_genres(body.genres.as_deref().unwrap_or(""));
    let mut game = Game::new(name.to_string(), price_cents, genres, auth.user_id);
    game.description = body.description.unwrap_or_default();
    game.developer = body.developer.unwrap_or_default();
    game.release_date = body.release_date;
    game.tags = body.tags.unwrap_or_default();
    game.image_file = body.image_file;
    game.archive_file = body.archive_file;

    state.store.put_game(&game)?;

    tracing::info!(game_id = %game.id, seller = %auth.user_id, "Game published");

    Ok((StatusCode::CREATED, Json(GameResponse::from(&game))))
}

/// List all games.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let games = state.store.list_games()?;

    Ok(Json(games.iter().map(GameResponse::from).collect()))
}

/// Get one game.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let game = state
        .store
        .get_game(game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    Ok(Json(GameResponse::from(&game)))
}

/// Game update request. Absent fields keep their current values.
#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New price in cents.
    #[serde(default)]
    pub price_cents: Option<i64>,
    /// New comma-joined genre tags.
    #[serde(default)]
    pub genres: Option<String>,
    /// New developer name.
    #[serde(default)]
    pub developer: Option<String>,
    /// New release date.
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    /// New tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New cover image reference.
    #[serde(default)]
    pub image_file: Option<String>,
    /// New archive reference.
    #[serde(default)]
    pub archive_file: Option<String>,
}

/// Update a game. Only the creator or an admin may update.
pub async fn update_game(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(game_id): Path<String>,
    Json(body): Json<UpdateGameRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let mut game = state
        .store
        .get_game(game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    require_game_access(&state, auth.user_id, &game)?;

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".into()));
        }
        game.name = name;
    }
    if let Some(price_cents) = body.price_cents {
        if price_cents < 0 {
            return Err(ApiError::BadRequest("price must not be negative".into()));
        }
        game.price_cents = price_cents;
    }
    if let Some(description) = body.description {
        game.description = description;
    }
    if let Some(genres) = body.genres {
        game.genres = parse_genres(&genres);
    }
    if let Some(developer) = body.developer {
        game.developer = developer;
    }
    if let Some(release_date) = body.release_date {
        game.release_date = Some(release_date);
    }
    if let Some(tags) = body.tags {
        game.tags = tags;
    }
    if let Some(image_file) = body.image_file {
        game.image_file = Some(image_file);
    }
    if let Some(archive_file) = body.archive_file {
        game.archive_file = Some(archive_file);
    }
    game.updated_at = Utc::now();

    state.store.put_game(&game)?;

    tracing::info!(game_id = %game.id, by = %auth.user_id, "Game updated");

    Ok(Json(GameResponse::from(&game)))
}

/// Delete a game. Only the creator or an admin may delete. Existing
/// entitlements and ledger entries are untouched.
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let game_id = parse_game_id(&game_id)?;
    let game = state
        .store
        .get_game(game_id)?
        .ok_or_else(|| ApiError::NotFound("game not found".into()))?;

    require_game_access(&state, auth.user_id, &game)?;

    state.store.delete_game(game_id)?;

    tracing::info!(game_id = %game_id, by = %auth.user_id, "Game deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Genre-based recommendations for a user. An empty library yields an
/// empty list, never an error.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("invalid user id".into()))?;

    let user = state
        .store
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let owned = state.store.get_games(&user.owned_games)?;
    let catalog = state.store.list_games()?;
    let picks = recommend(&owned, &catalog, state.config.recommendation_limit);

    Ok(Json(picks.iter().map(GameResponse::from).collect()))
}

/// Reject callers who are neither the game's creator nor an admin.
fn require_game_access(state: &AppState, user_id: UserId, game: &Game) -> Result<(), ApiError> {
    if game.created_by == user_id {
        return Ok(());
    }
    let user = state.store.get_user(user_id)?.ok_or(ApiError::Unauthorized)?;
    if user.is_admin() {
        return Ok(());
    }
    Err(ApiError::Forbidden(
        "only the creator or an admin may modify this game".into(),
    ))
}

fn parse_game_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse::<GameId>()
        .map_err(|_| ApiError::BadRequest("invalid game id".into()))
}
