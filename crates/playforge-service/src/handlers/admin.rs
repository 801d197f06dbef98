//! Admin-only handlers: full ledger, user listing, role changes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use playforge_core::{Role, UserId};
use playforge_store::Store;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::users::{LedgerEntryResponse, UserResponse};
use crate::state::AppState;

/// List the full purchase ledger, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<LedgerEntryResponse>>, ApiError> {
    let entries = state.store.list_ledger_all()?;

    Ok(Json(entries.iter().map(LedgerEntryResponse::from).collect()))
}

/// List all registered users.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.store.list_users()?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Grant a user the admin role.
pub async fn promote(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    set_role(&state, &admin, &user_id, Role::Admin)
}

/// Revoke a user's admin role.
pub async fn demote(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    set_role(&state, &admin, &user_id, Role::User)
}

fn set_role(
    state: &AppState,
    admin: &AdminUser,
    user_id: &str,
    role: Role,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("invalid user id".into()))?;

    let user = state.store.set_role(user_id, role)?;

    tracing::info!(
        admin = %admin.user.id,
        user_id = %user.id,
        role = ?user.role,
        "Role changed"
    );

    Ok(Json(UserResponse::from(&user)))
}
