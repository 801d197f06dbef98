//! Genre-based recommendations.
//!
//! The engine is a content tag-overlap heuristic: tally genre frequency over
//! the games a user owns, take the most frequent genres, and suggest unowned
//! games that share at least one of them. Frequency ties break by
//! first-encountered order, which keeps the result deterministic for a given
//! library ordering.

use std::collections::HashSet;

use crate::{Game, GameId};

/// How many top genres feed the overlap match.
pub const TOP_GENRE_COUNT: usize = 3;

/// Count genre occurrences across `games`, preserving the order in which
/// genres are first encountered.
#[must_use]
pub fn genre_tally(games: &[Game]) -> Vec<(String, usize)> {
    let mut tally: Vec<(String, usize)> = Vec::new();
    for game in games {
        for genre in &game.genres {
            if let Some(slot) = tally.iter_mut().find(|(name, _)| name == genre) {
                slot.1 += 1;
            } else {
                tally.push((genre.clone(), 1));
            }
        }
    }
    tally
}

/// Rank genres by descending frequency and keep the top `n`. The sort is
/// stable, so equal counts keep their first-encountered order.
#[must_use]
pub fn top_genres(tally: &[(String, usize)], n: usize) -> Vec<String> {
    let mut ranked = tally.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(name, _)| name).collect()
}

/// Select up to `limit` games from `catalog` that the user does not own and
/// whose genre set intersects the user's top genres.
///
/// Returns an empty list (never an error) when the user owns nothing or no
/// overlap exists.
#[must_use]
pub fn recommend(owned: &[Game], catalog: &[Game], limit: usize) -> Vec<Game> {
    if owned.is_empty() {
        return Vec::new();
    }

    let tally = genre_tally(owned);
    if tally.is_empty() {
        return Vec::new();
    }
    let favorites: HashSet<String> = top_genres(&tally, TOP_GENRE_COUNT).into_iter().collect();
    let owned_ids: HashSet<GameId> = owned.iter().map(|g| g.id).collect();

    catalog
        .iter()
        .filter(|game| !owned_ids.contains(&game.id))
        .filter(|game| game.genres.iter().any(|g| favorites.contains(g)))
        .take(limit)
        .cloned()
        .collect()
}
