//! Key encoding utilities for `RocksDB`.

use playforge_core::{GameId, TransactionId, UserId};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a username index key. Usernames are matched exactly.
#[must_use]
pub fn username_key(username: &str) -> Vec<u8> {
    username.as_bytes().to_vec()
}

/// Create an email index key. Emails are matched case-insensitively.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.to_lowercase().into_bytes()
}

/// Create a game key from a game ID.
#[must_use]
pub fn game_key(game_id: GameId) -> Vec<u8> {
    game_id.as_bytes().to_vec()
}

/// Create a ledger key from a transaction ID.
#[must_use]
pub fn ledger_key(transaction_id: TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a participant-ledger index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, a user's entries sort chronologically.
#[must_use]
pub fn user_ledger_key(user_id: UserId, transaction_id: TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Create a prefix for iterating all ledger entries for a user.
#[must_use]
pub fn user_ledger_prefix(user_id: UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the transaction ID from a participant-ledger index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn transaction_id_from_user_ledger_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes)
}

/// Create a play-record key.
///
/// Format: `user_id (16 bytes) || game_id (16 bytes)` — one record per pair.
#[must_use]
pub fn play_key(user_id: UserId, game_id: GameId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(game_id.as_bytes());
    key
}

/// Create a prefix for iterating all play records for a user.
#[must_use]
pub fn play_prefix(user_id: UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}
