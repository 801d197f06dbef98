//! `RocksDB` storage layer for Playforge.
//!
//! This crate provides persistent storage for users, games, the purchase
//! ledger, and play-time records, using `RocksDB` with column families for
//! indexing.
//!
//! # Architecture
//!
//! - `users` / `users_by_name` / `users_by_email`: user records plus
//!   uniqueness indexes maintained atomically with the record.
//! - `games`: game records.
//! - `ledger` / `ledger_by_user`: append-only purchase ledger with a
//!   participant index covering both buyer and seller.
//! - `play_records`: per-(user, game) play-time accumulators.
//!
//! # Purchase atomicity
//!
//! [`Store::purchase_game`] is the purchase orchestrator's write path: it
//! validates all preconditions and commits buyer debit, entitlement grant,
//! seller credit, and the ledger entry in a single `WriteBatch`. Compound
//! mutations serialize through a store-level mutex, so two concurrent
//! purchases can never both pass the balance check against a stale read.
//!
//! # Example
//!
//! ```no_run
//! use playforge_store::{RocksStore, Store};
//! use playforge_core::{Game, User};
//!
//! let store = RocksStore::open("/tmp/playforge-db").unwrap();
//!
//! let seller = User::new("studio".into(), "studio@example.com".into(), "hash".into());
//! store.create_user(&seller).unwrap();
//!
//! let game = Game::new("Orbit".into(), 499, vec!["Arcade".into()], seller.id);
//! store.put_game(&game).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use playforge_core::{Game, GameId, LedgerEntry, PlayRecord, Role, TransactionId, User, UserId};

/// Outcome of a purchase request.
#[derive(Debug)]
pub enum PurchaseOutcome {
    /// The purchase went through; all writes were committed atomically.
    Completed(Box<PurchaseReceipt>),

    /// The buyer already owned the game. Nothing was charged and no ledger
    /// entry was written; callers treat this as success.
    AlreadyOwned,
}

/// Details of a completed purchase, for responses and notifications.
#[derive(Debug)]
pub struct PurchaseReceipt {
    /// The ledger entry that was appended.
    pub entry: LedgerEntry,

    /// Buyer email at purchase time (for the confirmation message).
    pub buyer_email: String,

    /// Seller email at purchase time (for the sale notification).
    pub seller_email: String,

    /// Buyer balance after the debit.
    pub buyer_balance_cents: i64,

    /// Seller balance after the credit.
    pub seller_balance_cents: i64,
}

/// The storage trait defining all database operations.
///
/// This abstracts the storage layer, allowing different implementations
/// (e.g. `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user, enforcing username and email uniqueness atomically.
    ///
    /// # Errors
    ///
    /// Returns `UsernameTaken`/`EmailTaken` on conflict, or a database error.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Get a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Replace a user record. The username and email must not have changed;
    /// uniqueness indexes are not rewritten here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users(&self) -> Result<Vec<User>>;

    /// Set a user's role, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user doesn't exist.
    fn set_role(&self, user_id: UserId, role: Role) -> Result<User>;

    /// Adjust a user's balance by `delta_cents` (positive or negative),
    /// returning the new balance. The adjustment is atomic with respect to
    /// other compound mutations and never lets the balance go negative.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user doesn't exist, or `Overdraw` if the
    /// delta would drive the balance below zero.
    fn adjust_balance(&self, user_id: UserId, delta_cents: i64) -> Result<i64>;

    // =========================================================================
    // Game Operations
    // =========================================================================

    /// Insert or replace a game record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_game(&self, game: &Game) -> Result<()>;

    /// Get a game by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_game(&self, game_id: GameId) -> Result<Option<Game>>;

    /// Batch-lookup games by ID. Missing ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_games(&self, game_ids: &[GameId]) -> Result<Vec<Game>>;

    /// List all games.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_games(&self) -> Result<Vec<Game>>;

    /// Delete a game.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game doesn't exist.
    fn delete_game(&self, game_id: GameId) -> Result<()>;

    // =========================================================================
    // Ledger Operations (write-once, read-many)
    // =========================================================================

    /// Get a ledger entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_ledger_entry(&self, transaction_id: TransactionId) -> Result<Option<LedgerEntry>>;

    /// List ledger entries where the user is buyer or seller, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_ledger_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>>;

    /// List all ledger entries, newest first. Admin-only in the calling layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_ledger_all(&self) -> Result<Vec<LedgerEntry>>;

    // =========================================================================
    // Play-Time Operations
    // =========================================================================

    /// Atomically add `seconds` to the (user, game) accumulator, creating it
    /// on first play. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn record_play_time(&self, user_id: UserId, game_id: GameId, seconds: i64)
        -> Result<PlayRecord>;

    /// List all play records for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_play_records(&self, user_id: UserId) -> Result<Vec<PlayRecord>>;

    // =========================================================================
    // Purchase (compound)
    // =========================================================================

    /// Execute a purchase end-to-end: validate preconditions in order, then
    /// commit buyer debit + entitlement grant, seller credit, and the ledger
    /// entry in one atomic batch.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the buyer, game, or seller doesn't exist.
    /// - `SelfPurchase` if the buyer created the game.
    /// - `InsufficientFunds` if the balance is below the price.
    ///
    /// On any error, no state is modified.
    fn purchase_game(&self, buyer_id: UserId, game_id: GameId) -> Result<PurchaseOutcome>;
}
