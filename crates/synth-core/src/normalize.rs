//! Column-header normalization for the daily export files.
//!
//! The exports come from several scraping runs with inconsistent headers
//! (quoting, case, stray whitespace, hyphens, synonyms). Everything is mapped
//! onto a small canonical schema before any rows are read.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical column: identifier column of the source exports.
pub const COL_ID: &str = "id";
/// Canonical column: game display name.
pub const COL_NAME: &str = "name";
/// Canonical column: daily peak concurrent players.
pub const COL_PEAK_PLAYERS: &str = "peak_players";
/// Canonical column: total hours played that day.
pub const COL_HOURS_PLAYED: &str = "hours_played";

/// Synonyms accepted for each canonical column, in match priority order.
/// All entries are already in cleaned form (see [`clean_column_name`]).
const COLUMN_SPECS: &[ColumnSpec] = &[
    ColumnSpec {
        canonical: COL_ID,
        synonyms: &["id", "app_id", "appid"],
    },
    ColumnSpec {
        canonical: COL_NAME,
        synonyms: &["name", "game", "title"],
    },
    ColumnSpec {
        canonical: COL_PEAK_PLAYERS,
        synonyms: &[
            "peak_players",
            "peakplayers",
            "peak_concurrent",
            "peak_no._of_players",
        ],
    },
    ColumnSpec {
        canonical: COL_HOURS_PLAYED,
        synonyms: &["hours_played", "hoursplayed", "playtime"],
    },
];

/// One canonical column with its accepted header spellings.
struct ColumnSpec {
    canonical: &'static str,
    synonyms: &'static [&'static str],
}

fn separator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-]+").expect("static regex"))
}

/// Clean a raw header into a canonical lowercase identifier.
///
/// Strips quote characters, trims the ends, collapses internal whitespace
/// and hyphen runs to a single underscore, and lowercases. Idempotent:
/// cleaning an already-clean name is a no-op.
///
/// `" Peak-No. Of Players "` → `"peak_no._of_players"`.
pub fn clean_column_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let trimmed = stripped.trim();
    separator_run().replace_all(trimmed, "_").to_lowercase()
}

/// Map cleaned observed headers onto the canonical schema.
///
/// Returns `canonical name → column index` using the first matching synonym
/// for each canonical column. Returns `None` when any column named in
/// `required` has no match, in which case the caller must skip the entire
/// file rather than emit partial records.
pub fn map_columns(
    headers: &[String],
    required: &[&str],
) -> Option<HashMap<&'static str, usize>> {
    let cleaned: Vec<String> = headers.iter().map(|h| clean_column_name(h)).collect();

    let mut mapping = HashMap::new();
    for spec in COLUMN_SPECS {
        let found = spec
            .synonyms
            .iter()
            .find_map(|syn| cleaned.iter().position(|c| c == syn));

        if let Some(idx) = found {
            mapping.insert(spec.canonical, idx);
        } else if required.contains(&spec.canonical) {
            return None;
        }
    }

    Some(mapping)
}

/// The full schema the daily loader requires from every export file.
pub const DAILY_REQUIRED: &[&str] = &[COL_ID, COL_NAME, COL_PEAK_PLAYERS, COL_HOURS_PLAYED];

/// The looser schema the weight estimator accepts.
pub const WEIGHT_REQUIRED: &[&str] = &[COL_NAME, COL_PEAK_PLAYERS];
