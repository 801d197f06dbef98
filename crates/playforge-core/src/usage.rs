//! Play-time accumulation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserId};

/// Accumulated play time for one (user, game) pair.
///
/// Stored in seconds; clients that want minutes use [`PlayRecord::minutes_played`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRecord {
    /// The player.
    pub user_id: UserId,

    /// The game played.
    pub game_id: GameId,

    /// Total seconds played across all sessions.
    pub seconds_played: i64,

    /// When the last play event was recorded.
    pub last_played: DateTime<Utc>,
}

impl PlayRecord {
    /// Create a record for the first play event of a pair.
    #[must_use]
    pub fn new(user_id: UserId, game_id: GameId, seconds: i64) -> Self {
        Self {
            user_id,
            game_id,
            seconds_played: seconds,
            last_played: Utc::now(),
        }
    }

    /// Add a play session and refresh the last-played timestamp.
    pub fn accumulate(&mut self, seconds: i64) {
        self.seconds_played += seconds;
        self.last_played = Utc::now();
    }

    /// Total play time in minutes, rounded to the nearest minute.
    #[must_use]
    pub fn minutes_played(&self) -> i64 {
        (self.seconds_played + 30) / 60
    }
}
