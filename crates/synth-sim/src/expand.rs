//! Mode A: per-record expansion.
//!
//! Every daily (game, date) row with positive hours-played is expanded into a
//! plausible number of individual sessions: the count comes from dividing the
//! day's total minutes by an assumed mean session length (optionally
//! perturbed by a noise fraction), and each session gets an evening-biased
//! start hour and a fixed or uniformly sampled duration.

use chrono::Duration;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use synth_core::config::Config;
use synth_core::models::{DailyGameRecord, SessionRecord};
use synth_core::{Result, SynthError};
use tracing::{debug, info};

// ── Parameters ────────────────────────────────────────────────────────────────

/// How session durations are chosen during expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationModel {
    /// Every session lasts exactly this many minutes.
    Fixed(i64),
    /// Uniform draw from `[min, max]` minutes, inclusive.
    Uniform { min: i64, max: i64 },
}

impl DurationModel {
    /// Collapse equal bounds to a fixed duration.
    pub fn from_bounds(min: i64, max: i64) -> Self {
        if min == max {
            DurationModel::Fixed(min)
        } else {
            DurationModel::Uniform { min, max }
        }
    }

    fn sample(&self, rng: &mut impl Rng) -> i64 {
        match *self {
            DurationModel::Fixed(minutes) => minutes,
            DurationModel::Uniform { min, max } => rng.gen_range(min..=max),
        }
    }
}

/// Tunables for the per-record expansion.
#[derive(Debug, Clone)]
pub struct ExpandParams {
    /// Assumed mean session length used to derive the session count.
    pub avg_session_minutes: f64,
    /// Ceiling on sessions expanded from a single daily record.
    pub max_sessions_per_day: u32,
    /// Fractional noise on the estimated count, in [0, 1]; zero disables it.
    pub count_noise: f64,
    pub duration: DurationModel,
    /// Center of the Gaussian start-hour distribution.
    pub peak_hour: f64,
    /// Spread of the Gaussian start-hour distribution.
    pub peak_stddev: f64,
}

impl ExpandParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            avg_session_minutes: config.avg_session_duration_min,
            max_sessions_per_day: config.max_sessions_per_day,
            count_noise: config.session_count_noise,
            duration: DurationModel::from_bounds(
                config.session_duration_min,
                config.session_duration_max,
            ),
            peak_hour: config.session_peak_hour,
            peak_stddev: config.session_peak_stddev,
        }
    }
}

// ── Expansion ─────────────────────────────────────────────────────────────────

/// Expand daily aggregate records into individual sessions.
///
/// The RNG is injected so callers control reproducibility: a seeded generator
/// makes the noise term and all sampling deterministic.
///
/// User identifiers are minted `user_1`, `user_2`, … monotonically across the
/// entire run and never reused; the model does not simulate returning users.
pub fn expand_sessions(
    records: &[DailyGameRecord],
    params: &ExpandParams,
    rng: &mut impl Rng,
) -> Result<Vec<SessionRecord>> {
    if records.is_empty() {
        return Err(SynthError::NoGames(
            "no daily records to expand".to_string(),
        ));
    }
    if params.avg_session_minutes <= 0.0 {
        return Err(SynthError::Config(
            "avg_session_duration_min must be positive".to_string(),
        ));
    }

    let start_hour = Normal::new(params.peak_hour, params.peak_stddev)
        .map_err(|e| SynthError::Config(format!("invalid start-hour distribution: {}", e)))?;

    let mut sessions: Vec<SessionRecord> = Vec::new();
    let mut user_counter: u64 = 0;

    for record in records {
        if record.hours_played <= 0.0 {
            continue;
        }

        let num_sessions = estimate_session_count(
            record.hours_played,
            params.avg_session_minutes,
            params.count_noise,
            params.max_sessions_per_day,
            rng,
        );

        let midnight = record.date.and_time(chrono::NaiveTime::MIN);

        for _ in 0..num_sessions {
            user_counter += 1;

            // Evening-biased start hour; clamping keeps the session on the
            // record's own calendar date.
            let hour = (start_hour.sample(rng) as i64).clamp(0, 23);
            let minute = rng.gen_range(0..60i64);
            let second = rng.gen_range(0..60i64);

            let session_start = midnight
                + Duration::hours(hour)
                + Duration::minutes(minute)
                + Duration::seconds(second);

            let duration = params.duration.sample(rng);
            let session_end = session_start + Duration::minutes(duration);

            sessions.push(SessionRecord {
                user_id: format!("user_{}", user_counter),
                game_id: record.game_name.clone(),
                session_start,
                session_end,
                duration,
            });
        }

        debug!(
            "Expanded {} on {} into {} sessions",
            record.game_name, record.date, num_sessions
        );
    }

    info!(
        "Expanded {} daily records into {} sessions",
        records.len(),
        sessions.len()
    );
    Ok(sessions)
}

/// Estimate how many sessions a day's total hours represent.
///
/// `floor(hours × 60 / avg)` perturbed by `uniform(-noise, noise)` of itself,
/// then clamped into `[1, max_per_day]`.
fn estimate_session_count(
    hours_played: f64,
    avg_session_minutes: f64,
    noise: f64,
    max_per_day: u32,
    rng: &mut impl Rng,
) -> u64 {
    let mut estimate = hours_played * 60.0 / avg_session_minutes;
    if noise > 0.0 {
        estimate += rng.gen_range(-noise..noise) * estimate;
    }
    (estimate as u64).clamp(1, u64::from(max_per_day))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
