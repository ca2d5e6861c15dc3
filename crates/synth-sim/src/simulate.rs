//! Mode B: population-weighted simulation.
//!
//! Instead of expanding individual daily records, this mode draws a target
//! number of sessions for a fixed user pool over a simulation window, biasing
//! game choice by popularity weight and start times by day-of-week patterns:
//! weekends use a triangular afternoon-to-night distribution, weekdays a
//! Gaussian centered on the evening. Durations follow a clamped log-normal.
//!
//! Every draw comes from one seeded ChaCha stream, so two runs with the same
//! configuration and input produce byte-identical session sequences.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::distributions::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Normal, Triangular};
use synth_core::config::Config;
use synth_core::models::{GameWeights, SessionRecord};
use synth_core::{Result, SynthError};
use tracing::info;

// ── Time-of-day and duration shape constants ──────────────────────────────────

/// Weekend start hours: noon to 11pm, centered around 8pm.
const WEEKEND_HOUR_LOW: f64 = 12.0;
const WEEKEND_HOUR_HIGH: f64 = 23.0;
const WEEKEND_HOUR_PEAK: f64 = 20.0;

/// Weekday start hours: centered around 7pm with some spread.
const WEEKDAY_HOUR_MEAN: f64 = 19.0;
const WEEKDAY_HOUR_STDDEV: f64 = 3.0;

/// Log-normal duration shape (log-space mean and sigma) and clamp bounds.
const DURATION_LOG_MEAN: f64 = 3.8;
const DURATION_LOG_SIGMA: f64 = 1.0;
const DURATION_MIN_MINUTES: i64 = 15;
const DURATION_MAX_MINUTES: i64 = 600;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Tunables for the population-weighted simulation.
#[derive(Debug, Clone)]
pub struct SimulateParams {
    /// Size of the fixed user pool (`USER_0001` …).
    pub num_users: u32,
    /// Length of the simulation window in days.
    pub simulation_days: u32,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Total number of sessions to draw.
    pub target_session_count: u64,
    /// Seed for the single RNG stream.
    pub seed: u64,
}

impl SimulateParams {
    pub fn from_config(config: &Config) -> Self {
        let gen = &config.session_generation;
        Self {
            num_users: gen.num_users,
            simulation_days: gen.simulation_days,
            start_date: gen.start_date,
            target_session_count: gen.target_session_count,
            seed: gen.seed,
        }
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Draw `target_session_count` sessions for a fixed user pool, biased by the
/// supplied popularity weights.
pub fn simulate_sessions(
    weights: &GameWeights,
    params: &SimulateParams,
) -> Result<Vec<SessionRecord>> {
    if weights.is_empty() {
        return Err(SynthError::NoGames("empty weight table".to_string()));
    }
    if weights.total() <= 0.0 {
        return Err(SynthError::NoGames(
            "weights sum to zero; nothing to sample".to_string(),
        ));
    }
    if params.num_users == 0 || params.simulation_days == 0 {
        return Err(SynthError::Config(
            "simulation needs at least one user and one day".to_string(),
        ));
    }

    // GameWeights iterates in name-sorted order, which keeps the index
    // distribution stable across runs.
    let games: Vec<&str> = weights.iter().map(|(name, _)| name).collect();
    let game_index = WeightedIndex::new(weights.iter().map(|(_, w)| w))
        .map_err(|e| SynthError::NoGames(format!("invalid weight table: {}", e)))?;

    let weekend_hours = Triangular::new(WEEKEND_HOUR_LOW, WEEKEND_HOUR_HIGH, WEEKEND_HOUR_PEAK)
        .expect("static triangular bounds");
    let weekday_hours =
        Normal::new(WEEKDAY_HOUR_MEAN, WEEKDAY_HOUR_STDDEV).expect("static normal bounds");
    let durations =
        LogNormal::new(DURATION_LOG_MEAN, DURATION_LOG_SIGMA).expect("static log-normal shape");

    let users: Vec<String> = (1..=params.num_users)
        .map(|i| format!("USER_{:04}", i))
        .collect();

    info!(
        "Simulating {} sessions for {} users over {} days",
        params.target_session_count, params.num_users, params.simulation_days
    );

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut sessions = Vec::with_capacity(params.target_session_count as usize);
    let progress_step = (params.target_session_count / 10).max(1);

    for i in 0..params.target_session_count {
        if (i + 1) % progress_step == 0 {
            info!(
                "Simulation progress: {:.0}% complete",
                (i + 1) as f64 / params.target_session_count as f64 * 100.0
            );
        }

        let user_id = users[rng.gen_range(0..users.len())].clone();
        let game_id = games[game_index.sample(&mut rng)].to_string();

        let day_offset = rng.gen_range(0..u64::from(params.simulation_days));
        let date = params.start_date + Duration::days(day_offset as i64);
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

        let base_hour = if is_weekend {
            weekend_hours.sample(&mut rng)
        } else {
            weekday_hours.sample(&mut rng)
        };
        let hour = (base_hour.clamp(0.0, 23.0)) as u32;
        let minute = rng.gen_range(0..60u32);

        let session_start = date
            .and_hms_opt(hour, minute, 0)
            .expect("clamped hour and minute are valid");

        let duration =
            (durations.sample(&mut rng) as i64).clamp(DURATION_MIN_MINUTES, DURATION_MAX_MINUTES);
        let session_end = session_start + Duration::minutes(duration);

        sessions.push(SessionRecord {
            user_id,
            game_id,
            session_start,
            session_end,
            duration,
        });
    }

    info!("Session simulation complete: {} sessions", sessions.len());
    Ok(sessions)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn weights() -> GameWeights {
        let mut w = GameWeights::new();
        w.insert("Dota 2", 3.0);
        w.insert("Counter-Strike", 2.0);
        w.insert("Stardew Valley", 1.0);
        w
    }

    fn params() -> SimulateParams {
        SimulateParams {
            num_users: 50,
            simulation_days: 30,
            start_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            target_session_count: 500,
            seed: 42,
        }
    }

    #[test]
    fn test_fixed_seed_reproducible() {
        let a = simulate_sessions(&weights(), &params()).unwrap();
        let b = simulate_sessions(&weights(), &params()).unwrap();
        assert_eq!(a, b, "same seed and input must reproduce byte-identically");
    }

    #[test]
    fn test_different_seed_diverges() {
        let mut p = params();
        let a = simulate_sessions(&weights(), &p).unwrap();
        p.seed = 43;
        let b = simulate_sessions(&weights(), &p).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_target_count_honored() {
        let sessions = simulate_sessions(&weights(), &params()).unwrap();
        assert_eq!(sessions.len(), 500);
    }

    #[test]
    fn test_games_drawn_only_from_weight_table() {
        let sessions = simulate_sessions(&weights(), &params()).unwrap();
        for session in &sessions {
            assert!(
                weights().get(&session.game_id).is_some(),
                "unknown game {}",
                session.game_id
            );
        }
    }

    #[test]
    fn test_users_drawn_from_fixed_pool() {
        let sessions = simulate_sessions(&weights(), &params()).unwrap();
        for session in &sessions {
            let n: u32 = session.user_id.strip_prefix("USER_").unwrap().parse().unwrap();
            assert!((1..=50).contains(&n));
        }
    }

    #[test]
    fn test_durations_clamped() {
        let sessions = simulate_sessions(&weights(), &params()).unwrap();
        for session in &sessions {
            assert!((15..=600).contains(&session.duration));
            assert_eq!(
                session.session_end,
                session.session_start + Duration::minutes(session.duration)
            );
        }
    }

    #[test]
    fn test_dates_within_window() {
        let sessions = simulate_sessions(&weights(), &params()).unwrap();
        let start = NaiveDate::from_ymd_opt(2022, 5, 1).unwrap();
        let end = start + Duration::days(30);
        for session in &sessions {
            let date = session.session_start.date();
            assert!(date >= start && date < end);
            assert!(session.session_start.hour() <= 23);
        }
    }

    #[test]
    fn test_higher_weight_drawn_more_often() {
        let mut p = params();
        p.target_session_count = 3000;
        let sessions = simulate_sessions(&weights(), &p).unwrap();
        let count = |name: &str| sessions.iter().filter(|s| s.game_id == name).count();
        assert!(
            count("Dota 2") > count("Stardew Valley"),
            "weight 3 game should out-draw weight 1 game over 3000 samples"
        );
    }

    #[test]
    fn test_empty_weights_refused() {
        let err = simulate_sessions(&GameWeights::new(), &params()).unwrap_err();
        assert!(matches!(err, SynthError::NoGames(_)));
    }

    #[test]
    fn test_zero_total_weight_refused() {
        let mut w = GameWeights::new();
        w.insert("Ghost Town", 0.0);
        let err = simulate_sessions(&w, &params()).unwrap_err();
        assert!(matches!(err, SynthError::NoGames(_)));
    }
}
