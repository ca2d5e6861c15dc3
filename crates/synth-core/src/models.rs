use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One (game, date) row observed in the daily export files.
///
/// Duplicates across files for the same pair are retained; the loader makes
/// no deduplication guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGameRecord {
    /// Source identifier column (`id` in the exports).
    pub game_id: String,
    /// Display name of the game.
    pub game_name: String,
    /// Calendar date parsed from the file name.
    pub date: NaiveDate,
    /// Maximum concurrent player count reported for that day.
    pub peak_players: u64,
    /// Total hours played across all players that day.
    pub hours_played: f64,
}

/// Relative popularity weights, one per distinct game name.
///
/// The weight is a dense rank of the mean peak-player count (ascending), so
/// ties share a rank and a strictly more popular game always ranks higher.
/// Backed by a `BTreeMap` so iteration order is deterministic, which keeps
/// seeded simulation runs byte-identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameWeights(BTreeMap<String, f64>);

impl GameWeights {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, game: impl Into<String>, weight: f64) {
        self.0.insert(game.into(), weight);
    }

    pub fn get(&self, game: &str) -> Option<f64> {
        self.0.get(game).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights; zero when empty.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Games and weights in deterministic (name-sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for GameWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A synthesized user session.
///
/// `session_id` is not part of the model: the SQLite sink assigns it via an
/// auto-incrementing primary key at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Freshly minted per session; the model never reuses a user.
    pub user_id: String,
    /// References a game present in the upstream data or weight table.
    pub game_id: String,
    pub session_start: NaiveDateTime,
    pub session_end: NaiveDateTime,
    /// Whole minutes; equals `session_end - session_start` after cleaning.
    pub duration: i64,
}

impl SessionRecord {
    /// Duration in whole minutes re-derived from the two timestamps,
    /// rounded to the nearest minute.
    pub fn recomputed_duration(&self) -> i64 {
        let seconds = (self.session_end - self.session_start).num_seconds();
        (seconds as f64 / 60.0).round() as i64
    }
}

/// One catalog entry with its resolved (or placeholder) display name.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogGame {
    pub app_id: u64,
    pub name: String,
    pub peak_in_game: u64,
}

/// Immutable result of one catalog fetch phase, ready for atomic persistence.
#[derive(Debug, Clone)]
pub struct CatalogBatch {
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    pub games: Vec<CatalogGame>,
}
