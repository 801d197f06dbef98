//! Password hashing.
//!
//! Passwords are hashed with bcrypt; only the hash is persisted. Hashing
//! runs on the blocking pool since a production cost factor takes tens of
//! milliseconds.

use crate::error::ApiError;

/// Hash a password with the configured cost factor.
///
/// # Errors
///
/// Returns an internal error if hashing fails.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns an internal error if verification fails to run. A wrong password
/// is `Ok(false)`, not an error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))
}
