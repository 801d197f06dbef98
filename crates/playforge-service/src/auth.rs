//! Session tokens and authentication extractors.
//!
//! This module provides:
//! - [`issue_token`] - mint an HS256 session token at login
//! - [`AuthUser`] - extractor validating the bearer token
//! - [`AdminUser`] - extractor additionally requiring the admin role

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use playforge_core::{User, UserId};
use playforge_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims for a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

/// Mint a session token for `user_id`.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn issue_token(user_id: UserId, state: &AppState) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        iss: state.config.jwt_issuer.clone(),
        aud: state.config.jwt_audience.clone(),
        exp: (now + Duration::days(state.config.token_ttl_days)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
}

/// Validate a bearer token and return its claims.
fn validate_token(token: &str, state: &AppState) -> Result<SessionClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[&state.config.jwt_audience]);
    validation.set_issuer(&[&state.config.jwt_issuer]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Token validation failed");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

/// An authenticated user extracted from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(parts)?;
            let claims = validate_token(token, state)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser { user_id })
        })
    }
}

/// An authenticated admin. Loads the user record and requires the admin
/// role, so a revoked admin is rejected even with a still-valid token.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// The admin's user record.
    pub user: User,
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(parts)?;
            let claims = validate_token(token, state)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            let user = state
                .store
                .get_user(user_id)?
                .ok_or(ApiError::Unauthorized)?;

            if !user.is_admin() {
                return Err(ApiError::Forbidden("admin role required".into()));
            }

            Ok(AdminUser { user })
        })
    }
}
