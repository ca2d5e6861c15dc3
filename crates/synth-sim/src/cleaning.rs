//! Post-synthesis cleaning pass.
//!
//! Re-derives every duration from its timestamps (the two must agree after
//! this pass, whatever the synthesizer stored) and drops sessions that are
//! invalid: non-positive duration or a missing required field.

use synth_core::models::SessionRecord;
use tracing::info;

/// Outcome of one cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Surviving sessions with recomputed durations.
    pub sessions: Vec<SessionRecord>,
    /// How many sessions were removed.
    pub removed: usize,
}

/// Clean a synthesized session set.
pub fn clean_sessions(sessions: Vec<SessionRecord>) -> CleanReport {
    let initial = sessions.len();

    let sessions: Vec<SessionRecord> = sessions
        .into_iter()
        .filter_map(|mut session| {
            session.duration = session.recomputed_duration();
            let valid = session.duration > 0
                && !session.user_id.is_empty()
                && !session.game_id.is_empty();
            valid.then_some(session)
        })
        .collect();

    let removed = initial - sessions.len();
    info!(
        "Cleaning complete. Removed {} invalid/incomplete sessions",
        removed
    );

    CleanReport { sessions, removed }
}
