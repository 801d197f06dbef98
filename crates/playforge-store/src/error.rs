//! Error types for Playforge storage.
//!
//! Domain conditions evaluated inside compound operations (insufficient
//! funds, self-purchase, uniqueness conflicts) are distinct variants so the
//! service layer can map them to precise HTTP statuses, while `Database` and
//! `Serialization` stay infrastructure failures.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record ("user", "game", "transaction").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Username already registered.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Email already registered.
    #[error("email already taken: {0}")]
    EmailTaken(String),

    /// A user attempted to purchase their own game.
    #[error("cannot purchase your own game")]
    SelfPurchase,

    /// Buyer balance below the game price.
    #[error("insufficient funds: balance={balance_cents}, required={required_cents}")]
    InsufficientFunds {
        /// Current balance in cents.
        balance_cents: i64,
        /// Required amount in cents.
        required_cents: i64,
    },

    /// A balance adjustment would drive the balance negative.
    #[error("balance adjustment of {delta_cents} would overdraw balance {balance_cents}")]
    Overdraw {
        /// Current balance in cents.
        balance_cents: i64,
        /// Requested delta in cents.
        delta_cents: i64,
    },
}
