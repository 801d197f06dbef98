//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: username -> `user_id`. Enforces username uniqueness.
    pub const USERS_BY_NAME: &str = "users_by_name";

    /// Index: email -> `user_id`. Enforces email uniqueness.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Game records, keyed by `game_id`.
    pub const GAMES: &str = "games";

    /// Ledger entries, keyed by `transaction_id` (ULID, time-ordered).
    pub const LEDGER: &str = "ledger";

    /// Index: ledger entries by participant, keyed by
    /// `user_id || transaction_id`. One row per buyer and one per seller;
    /// value is empty (index only).
    pub const LEDGER_BY_USER: &str = "ledger_by_user";

    /// Play-time accumulators, keyed by `user_id || game_id`.
    pub const PLAY_RECORDS: &str = "play_records";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_NAME,
        cf::USERS_BY_EMAIL,
        cf::GAMES,
        cf::LEDGER,
        cf::LEDGER_BY_USER,
        cf::PLAY_RECORDS,
    ]
}
