//! Games published on the marketplace.
//!
//! Genres are modeled as an ordered list of tag strings. The legacy clients
//! exchange genres as a single comma-joined string, so [`parse_genres`] and
//! [`join_genres`] convert at the HTTP boundary; everywhere else the tags
//! stay individual.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, UserId};

/// A browser-playable game listed for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// The game ID, assigned at publication.
    pub id: GameId,

    /// Display name.
    pub name: String,

    /// Store-page description.
    pub description: String,

    /// Price in integer cents. 0 means free.
    pub price_cents: i64,

    /// Genre tags, trimmed and duplicate-preserving, in listing order.
    pub genres: Vec<String>,

    /// Developer / studio name.
    pub developer: String,

    /// Release date, if announced.
    pub release_date: Option<DateTime<Utc>>,

    /// Free-form tags (distinct from genres).
    pub tags: Vec<String>,

    /// Cover image file reference, if uploaded.
    pub image_file: Option<String>,

    /// Game archive file reference, if uploaded.
    pub archive_file: Option<String>,

    /// The seller: the user who published this game. Immutable.
    pub created_by: UserId,

    /// When the game was published.
    pub created_at: DateTime<Utc>,

    /// When the game was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create a new game owned by `created_by`. Optional attributes start
    /// empty and are filled in by updates or uploads.
    #[must_use]
    pub fn new(name: String, price_cents: i64, genres: Vec<String>, created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: GameId::generate(),
            name,
            description: String::new(),
            price_cents,
            genres,
            developer: String::new(),
            release_date: None,
            tags: Vec::new(),
            image_file: None,
            archive_file: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Split a comma-joined genre string into individual trimmed tags.
/// Empty tokens are dropped.
#[must_use]
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Join genre tags back into the comma-joined boundary format.
#[must_use]
pub fn join_genres(genres: &[String]) -> String {
    genres.join(", ")
}
