//! The purchase ledger.
//!
//! Every completed purchase appends exactly one [`LedgerEntry`]. Entries are
//! immutable: there is no update or delete anywhere in the system. Usernames
//! and the game title are denormalized snapshots taken at purchase time and
//! deliberately never follow later renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Game, GameId, TransactionId, User, UserId};

/// An immutable record of one completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry ID (ULID, time-ordered).
    pub id: TransactionId,

    /// The buyer.
    pub buyer_id: UserId,

    /// Buyer's username at purchase time.
    pub buyer_username: String,

    /// The seller (the game's creator).
    pub seller_id: UserId,

    /// Seller's username at purchase time.
    pub seller_username: String,

    /// The purchased game.
    pub game_id: GameId,

    /// Game title at purchase time.
    pub game_title: String,

    /// Price paid, in integer cents.
    pub amount_cents: i64,

    /// When the purchase completed (UTC).
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build the entry for a purchase of `game` by `buyer` from `seller`,
    /// snapshotting names and the price at this moment.
    #[must_use]
    pub fn purchase(buyer: &User, seller: &User, game: &Game) -> Self {
        Self {
            id: TransactionId::generate(),
            buyer_id: buyer.id,
            buyer_username: buyer.username.clone(),
            seller_id: seller.id,
            seller_username: seller.username.clone(),
            game_id: game.id,
            game_title: game.name.clone(),
            amount_cents: game.price_cents,
            created_at: Utc::now(),
        }
    }
}
