//! User accounts.
//!
//! A user is both a buyer (balance, owned games) and potentially a seller
//! (creator of published games). The owned set is duplicate-free by
//! construction: entitlements are only granted through [`User::grant_game`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserId};

/// A registered marketplace user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID, assigned at registration.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// Unique email address, used for purchase notifications.
    pub email: String,

    /// Bcrypt hash of the password. Never exposed through the API.
    pub password_hash: String,

    /// Current balance in integer cents.
    pub balance_cents: i64,

    /// Ids of games this user owns, in purchase order, duplicate-free.
    pub owned_games: Vec<GameId>,

    /// Authorization role.
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with zero balance and an empty library.
    #[must_use]
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            username,
            email,
            password_hash,
            balance_cents: 0,
            owned_games: Vec::new(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the balance covers a charge.
    #[must_use]
    pub fn can_afford(&self, amount_cents: i64) -> bool {
        self.balance_cents >= amount_cents
    }

    /// Check whether the user already owns a game.
    #[must_use]
    pub fn owns(&self, game_id: GameId) -> bool {
        self.owned_games.contains(&game_id)
    }

    /// Add a game to the owned set. Returns `false` (and leaves the set
    /// unchanged) if the game is already owned.
    pub fn grant_game(&mut self, game_id: GameId) -> bool {
        if self.owns(game_id) {
            return false;
        }
        self.owned_games.push(game_id);
        true
    }

    /// Check whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user: may buy, sell, and manage their own games.
    User,

    /// Admin: may additionally manage any game, list all users, read the
    /// full ledger, and change roles.
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "alice".into(),
            "alice@example.com".into(),
            "$2b$12$hash".into(),
        )
    }

    #[test]
    fn new_user_defaults() {
        let user = sample_user();
        assert_eq!(user.balance_cents, 0);
        assert!(user.owned_games.is_empty());
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn can_afford_boundary() {
        let mut user = sample_user();
        user.balance_cents = 1000;
        assert!(user.can_afford(999));
        assert!(user.can_afford(1000));
        assert!(!user.can_afford(1001));
    }

    #[test]
    fn grant_game_is_duplicate_free() {
        let mut user = sample_user();
        let game = GameId::generate();

        assert!(user.grant_game(game));
        assert!(!user.grant_game(game));
        assert_eq!(user.owned_games.len(), 1);
        assert!(user.owns(game));
    }
}
