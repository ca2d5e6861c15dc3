//! SQLite sink for synthesized session logs.
//!
//! Each run fully replaces the `session_logs` table: drop, recreate, and bulk
//! insert happen inside one transaction, so a failed run leaves the previous
//! table intact and a successful run is visible all at once.

use rusqlite::params;
use synth_core::models::SessionRecord;
use synth_core::Result;
use tracing::info;

use crate::database::Database;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const CREATE_SESSION_LOGS: &str = r#"
CREATE TABLE session_logs (
    session_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT,
    game_id TEXT,
    session_start TIMESTAMP,
    session_end TIMESTAMP,
    duration INTEGER
)
"#;

/// Replace the entire `session_logs` table with `sessions`.
///
/// Returns the number of rows inserted.
pub fn replace_session_logs(db: &mut Database, sessions: &[SessionRecord]) -> Result<usize> {
    let inserted = db.transaction(|tx| {
        tx.execute("DROP TABLE IF EXISTS session_logs", [])?;
        tx.execute(CREATE_SESSION_LOGS, [])?;

        let mut stmt = tx.prepare(
            "INSERT INTO session_logs (user_id, game_id, session_start, session_end, duration)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for session in sessions {
            stmt.execute(params![
                session.user_id,
                session.game_id,
                session.session_start.format(TIMESTAMP_FORMAT).to_string(),
                session.session_end.format(TIMESTAMP_FORMAT).to_string(),
                session.duration,
            ])?;
        }
        Ok(sessions.len())
    })?;

    info!("Stored {} session logs in {:?}", inserted, db.path());
    Ok(inserted)
}

/// Count of rows currently in `session_logs`; zero when the table is absent.
pub fn count_session_logs(db: &Database) -> Result<i64> {
    let exists: i64 = db.connection().query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'session_logs'",
        [],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Ok(0);
    }
    let count = db
        .connection()
        .query_row("SELECT COUNT(*) FROM session_logs", [], |row| row.get(0))?;
    Ok(count)
}
