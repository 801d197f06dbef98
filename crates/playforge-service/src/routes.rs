//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, games, health, play, users};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /api/users/register` - Register
/// - `POST /api/users/login` - Login
/// - `GET /api/games` / `GET /api/games/:id` - Browse the catalog
/// - `GET /api/games/recommendations/:user_id` - Recommendations
///
/// ## Authenticated (session token)
/// - `GET /api/users/me` - Profile
/// - `GET /api/users/me/library` - Owned games
/// - `POST /api/users/balance` - Top up balance
/// - `POST /api/users/purchase/:game_id` - Purchase a game
/// - `GET /api/users/transactions` - Own ledger entries
/// - `POST /api/games` / `PUT`/`DELETE /api/games/:id` - Manage games
/// - `POST /api/play/time` / `GET /api/play/time/me` - Play time
/// - `GET /api/play/:game_id/*path` - Staged game content
///
/// ## Admin (admin role)
/// - `GET /api/admin/transactions` - Full ledger
/// - `GET /api/admin/users` - All users
/// - `POST /api/admin/users/:id/promote` / `/demote` - Role changes
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Users
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/me", get(users::me))
        .route("/api/users/me/library", get(users::library))
        .route("/api/users/balance", post(users::top_up))
        .route("/api/users/purchase/:game_id", post(users::purchase))
        .route("/api/users/transactions", get(users::list_transactions))
        // Games
        .route("/api/games", post(games::create_game))
        .route("/api/games", get(games::list_games))
        .route(
            "/api/games/recommendations/:user_id",
            get(games::recommendations),
        )
        .route("/api/games/:game_id", get(games::get_game))
        .route("/api/games/:game_id", put(games::update_game))
        .route("/api/games/:game_id", delete(games::delete_game))
        // Play time and content
        .route("/api/play/time", post(play::record_time))
        .route("/api/play/time/me", get(play::my_play_time))
        .route("/api/play/:game_id/*path", get(play::serve_content))
        // Admin
        .route("/api/admin/transactions", get(admin::list_transactions))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:user_id/promote", post(admin::promote))
        .route("/api/admin/users/:user_id/demote", post(admin::demote))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
