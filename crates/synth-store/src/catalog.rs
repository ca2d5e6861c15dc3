//! SQLite persistence for fetched catalog batches.
//!
//! Unlike the session sink, catalog tables accumulate across runs: `games`
//! tracks first/last sighting per title and `player_counts` appends one
//! observation row per (timestamp, app) pair. One batch is persisted in a
//! single transaction.

use rusqlite::params;
use synth_core::models::CatalogBatch;
use synth_core::Result;
use tracing::info;

use crate::database::Database;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const CREATE_CATALOG_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    app_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    first_seen_timestamp TEXT NOT NULL,
    last_seen_timestamp TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS player_counts (
    timestamp TEXT NOT NULL,
    app_id INTEGER NOT NULL,
    player_count INTEGER NOT NULL,
    PRIMARY KEY (timestamp, app_id),
    FOREIGN KEY (app_id) REFERENCES games (app_id)
);
"#;

/// Create the catalog tables if they do not exist yet. Idempotent.
pub fn init_catalog_schema(db: &mut Database) -> Result<()> {
    db.transaction(|tx| {
        tx.execute_batch(CREATE_CATALOG_TABLES)?;
        Ok(())
    })
}

/// Persist one fetched batch: register unseen games, refresh last-seen
/// timestamps (and upgrade placeholder names when a real one arrives), and
/// append one player-count observation per game.
///
/// Returns the number of observation rows written.
pub fn persist_catalog_batch(db: &mut Database, batch: &CatalogBatch) -> Result<usize> {
    let timestamp = batch.fetched_at.format(TIMESTAMP_FORMAT).to_string();

    let written = db.transaction(|tx| {
        let mut upsert_game = tx.prepare(
            r#"INSERT INTO games (app_id, name, first_seen_timestamp, last_seen_timestamp)
               VALUES (?1, ?2, ?3, ?3)
               ON CONFLICT (app_id) DO UPDATE SET
                   last_seen_timestamp = excluded.last_seen_timestamp,
                   name = CASE
                       WHEN excluded.name NOT LIKE 'AppID\_%' ESCAPE '\' THEN excluded.name
                       ELSE games.name
                   END"#,
        )?;
        let mut insert_count = tx.prepare(
            "INSERT INTO player_counts (timestamp, app_id, player_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (timestamp, app_id) DO NOTHING",
        )?;

        let mut written = 0usize;
        for game in &batch.games {
            upsert_game.execute(params![game.app_id, game.name, timestamp])?;
            written += insert_count.execute(params![timestamp, game.app_id, game.peak_in_game])?;
        }
        Ok(written)
    })?;

    info!(
        "Persisted catalog batch: {} games, {} observations at {}",
        batch.games.len(),
        written,
        timestamp
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use synth_core::models::CatalogGame;

    fn ts(s: &str) -> DateTime<Utc> {
        format!("{}Z", s).parse().unwrap()
    }

    fn batch(at: &str, games: Vec<(u64, &str, u64)>) -> CatalogBatch {
        CatalogBatch {
            fetched_at: ts(at),
            games: games
                .into_iter()
                .map(|(app_id, name, peak)| CatalogGame {
                    app_id,
                    name: name.to_string(),
                    peak_in_game: peak,
                })
                .collect(),
        }
    }

    fn game_row(db: &Database, app_id: u64) -> (String, String, String) {
        db.connection()
            .query_row(
                "SELECT name, first_seen_timestamp, last_seen_timestamp
                 FROM games WHERE app_id = ?1",
                [app_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap()
    }

    #[test]
    fn test_init_schema_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();
        init_catalog_schema(&mut db).unwrap();
    }

    #[test]
    fn test_first_batch_registers_games_and_counts() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();

        let written = persist_catalog_batch(
            &mut db,
            &batch("2022-05-03T12:00:00", vec![(570, "Dota 2", 648_875)]),
        )
        .unwrap();
        assert_eq!(written, 1);

        let (name, first, last) = game_row(&db, 570);
        assert_eq!(name, "Dota 2");
        assert_eq!(first, "2022-05-03T12:00:00");
        assert_eq!(last, "2022-05-03T12:00:00");
    }

    #[test]
    fn test_second_batch_updates_last_seen_not_first_seen() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();

        persist_catalog_batch(
            &mut db,
            &batch("2022-05-03T12:00:00", vec![(570, "Dota 2", 600_000)]),
        )
        .unwrap();
        persist_catalog_batch(
            &mut db,
            &batch("2022-05-04T12:00:00", vec![(570, "Dota 2", 650_000)]),
        )
        .unwrap();

        let (_, first, last) = game_row(&db, 570);
        assert_eq!(first, "2022-05-03T12:00:00");
        assert_eq!(last, "2022-05-04T12:00:00");

        let counts: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM player_counts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(counts, 2);
    }

    #[test]
    fn test_placeholder_name_upgraded_by_real_name() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();

        persist_catalog_batch(
            &mut db,
            &batch("2022-05-03T12:00:00", vec![(570, "AppID_570", 600_000)]),
        )
        .unwrap();
        persist_catalog_batch(
            &mut db,
            &batch("2022-05-04T12:00:00", vec![(570, "Dota 2", 650_000)]),
        )
        .unwrap();

        let (name, _, _) = game_row(&db, 570);
        assert_eq!(name, "Dota 2");
    }

    #[test]
    fn test_real_name_not_downgraded_to_placeholder() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();

        persist_catalog_batch(
            &mut db,
            &batch("2022-05-03T12:00:00", vec![(570, "Dota 2", 600_000)]),
        )
        .unwrap();
        persist_catalog_batch(
            &mut db,
            &batch("2022-05-04T12:00:00", vec![(570, "AppID_570", 650_000)]),
        )
        .unwrap();

        let (name, _, _) = game_row(&db, 570);
        assert_eq!(name, "Dota 2");
    }

    #[test]
    fn test_duplicate_observation_not_inserted_twice() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();

        let b = batch("2022-05-03T12:00:00", vec![(570, "Dota 2", 600_000)]);
        assert_eq!(persist_catalog_batch(&mut db, &b).unwrap(), 1);
        assert_eq!(persist_catalog_batch(&mut db, &b).unwrap(), 0);

        let counts: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM player_counts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(counts, 1);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut db = Database::open_in_memory().unwrap();
        init_catalog_schema(&mut db).unwrap();
        let written =
            persist_catalog_batch(&mut db, &batch("2022-05-03T12:00:00", vec![])).unwrap();
        assert_eq!(written, 0);
    }
}
