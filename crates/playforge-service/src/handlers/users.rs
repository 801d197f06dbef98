//! User account, balance, purchase, and transaction handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use playforge_core::{GameId, LedgerEntry, Role, User};
use playforge_store::{PurchaseOutcome, Store};

use crate::auth::{issue_token, AuthUser};
use crate::error::ApiError;
use crate::handlers::games::GameResponse;
use crate::mailer::Mailer;
use crate::password::{hash_password, verify_password};
use crate::state::AppState;

/// User profile response. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Current balance in cents.
    pub balance_cents: i64,
    /// Balance formatted as dollars.
    pub balance_formatted: String,
    /// Authorization role.
    pub role: Role,
    /// Ids of owned games.
    pub owned_games: Vec<String>,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&User> for UserResponse {
    #[allow(clippy::cast_precision_loss)]
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            balance_cents: user.balance_cents,
            balance_formatted: format!("${:.2}", user.balance_cents as f64 / 100.0),
            role: user.role,
            owned_games: user.owned_games.iter().map(ToString::to_string).collect(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Ledger entry response.
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    /// Transaction ID.
    pub id: String,
    /// Buyer ID.
    pub buyer_id: String,
    /// Buyer username at purchase time.
    pub buyer_username: String,
    /// Seller ID.
    pub seller_id: String,
    /// Seller username at purchase time.
    pub seller_username: String,
    /// Game ID.
    pub game_id: String,
    /// Game title at purchase time.
    pub game_title: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// When the purchase completed.
    pub created_at: String,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            buyer_id: entry.buyer_id.to_string(),
            buyer_username: entry.buyer_username.clone(),
            seller_id: entry.seller_id.to_string(),
            seller_username: entry.seller_username.clone(),
            game_id: entry.game_id.to_string(),
            game_title: entry.game_title.clone(),
            amount_cents: entry.amount_cents,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    if !body.email.contains('@') {
        return Err(ApiError::BadRequest("invalid email address".into()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }

    let password_hash = hash_password(body.password, state.config.bcrypt_cost).await?;
    let user = User::new(username.to_string(), body.email.trim().to_string(), password_hash);

    state.store.create_user(&user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response: profile plus a session token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (bearer).
    pub token: String,
    /// The authenticated user's profile.
    pub user: UserResponse,
}

/// Log in with username and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Same rejection for unknown user and wrong password.
    let user = state
        .store
        .get_user_by_username(body.username.trim())?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(body.password, user.password_hash.clone()).await? {
        return Err(ApiError::Unauthorized);
    }

    let token = issue_token(user.id, &state)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Get the current user's profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .get_user(auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Get the current user's owned games.
pub async fn library(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let user = state
        .store
        .get_user(auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let games = state.store.get_games(&user.owned_games)?;

    Ok(Json(games.iter().map(GameResponse::from).collect()))
}

/// Balance top-up request.
#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    /// Amount to add, in cents. Must be positive.
    pub amount_cents: i64,
}

/// Top up the current user's balance.
pub async fn top_up(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<TopUpRequest>,
) -> Result<StatusCode, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::BadRequest("amount must be positive".into()));
    }

    let new_balance = state.store.adjust_balance(auth.user_id, body.amount_cents)?;

    tracing::info!(
        user_id = %auth.user_id,
        amount_cents = body.amount_cents,
        new_balance_cents = new_balance,
        "Balance topped up"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Purchase a game.
///
/// Responds 204 both for a completed purchase and for a game the caller
/// already owns; re-purchase never charges twice.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let game_id = game_id
        .parse::<GameId>()
        .map_err(|_| ApiError::BadRequest("invalid game id".into()))?;

    match state.store.purchase_game(auth.user_id, game_id)? {
        PurchaseOutcome::Completed(receipt) => {
            tracing::info!(
                buyer = %auth.user_id,
                game = %game_id,
                amount_cents = receipt.entry.amount_cents,
                transaction = %receipt.entry.id,
                "Purchase completed"
            );

            if let Some(mailer) = state.mailer.clone() {
                tokio::spawn(notify_purchase(mailer, *receipt));
            }

            Ok(StatusCode::NO_CONTENT)
        }
        PurchaseOutcome::AlreadyOwned => {
            tracing::debug!(buyer = %auth.user_id, game = %game_id, "Game already owned");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}

/// Send best-effort purchase notifications to the buyer and the seller.
/// Failures are logged; the purchase has already committed.
#[allow(clippy::cast_precision_loss)]
async fn notify_purchase(mailer: Arc<Mailer>, receipt: playforge_store::PurchaseReceipt) {
    let entry = &receipt.entry;
    let amount = format!("${:.2}", entry.amount_cents as f64 / 100.0);

    let buyer_body = format!(
        "Hi {}, your purchase of \"{}\" for {} is complete. Enjoy!",
        entry.buyer_username, entry.game_title, amount
    );
    if let Err(e) = mailer
        .send(
            &receipt.buyer_email,
            &format!("Purchase confirmed: {}", entry.game_title),
            &buyer_body,
        )
        .await
    {
        tracing::warn!(error = %e, to = %receipt.buyer_email, "Buyer notification failed");
    }

    let seller_body = format!(
        "Hi {}, {} just bought \"{}\" for {}.",
        entry.seller_username, entry.buyer_username, entry.game_title, amount
    );
    if let Err(e) = mailer
        .send(
            &receipt.seller_email,
            &format!("You made a sale: {}", entry.game_title),
            &seller_body,
        )
        .await
    {
        tracing::warn!(error = %e, to = %receipt.seller_email, "Seller notification failed");
    }
}

/// List the caller's ledger entries (as buyer or seller), newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<LedgerEntryResponse>>, ApiError> {
    let entries = state.store.list_ledger_for_user(auth.user_id)?;

    Ok(Json(entries.iter().map(LedgerEntryResponse::from).collect()))
}
