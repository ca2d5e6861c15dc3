//! YAML configuration document.
//!
//! All tunables for a run live in one file (conventionally `config.yaml`)
//! loaded once at process start and passed by reference into every component;
//! nothing reads configuration at import time. Missing required keys fail the
//! run before any data is touched.
//!
//! Documented fallback defaults (everything else is required):
//! - `daily_file_glob`                      → `*May*2022*/*.csv`
//! - `session_generation.seed`              → 42
//! - `catalog.top_n_games`                  → 10
//! - `catalog.base_url` / `catalog.store_url` → public ranking service URLs

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SynthError};

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root directory containing the dated export subdirectories.
    pub data_dir: PathBuf,
    /// Destination for the cleaned aggregate daily table (flat CSV sink).
    pub cleaned_data_file: PathBuf,
    /// Destination SQLite database for session logs.
    pub database_file: PathBuf,

    /// Glob (relative to `data_dir`) selecting the daily export files.
    #[serde(default = "default_daily_file_glob")]
    pub daily_file_glob: String,

    /// Mean session length assumed when expanding hours-played into sessions.
    pub avg_session_duration_min: f64,
    /// Per-record ceiling on expanded session count.
    pub max_sessions_per_day: u32,
    /// Lower bound for sampled session durations (minutes).
    pub session_duration_min: i64,
    /// Upper bound for sampled session durations (minutes). Equal to the
    /// minimum means a fixed duration.
    pub session_duration_max: i64,
    /// Fractional noise applied to the estimated session count, in [0, 1].
    pub session_count_noise: f64,
    /// Center of the start-hour distribution (0-23).
    pub session_peak_hour: f64,
    /// Standard deviation of the start-hour distribution.
    pub session_peak_stddev: f64,

    /// Population-weighted simulation (Mode B) parameters.
    pub session_generation: SessionGeneration,

    /// External ranking/catalog service settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Parameters for the population-weighted simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionGeneration {
    /// Size of the fixed user pool.
    pub num_users: u32,
    /// Length of the simulation window in days.
    pub simulation_days: u32,
    /// First day of the simulation window.
    pub start_date: NaiveDate,
    /// Total number of sessions to draw.
    pub target_session_count: u64,
    /// RNG seed; fixed seed ⇒ byte-identical reruns.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// External ranking/catalog service settings. Entirely optional; only the
/// `fetch` mode reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// How many top-ranked games to ingest per fetch.
    #[serde(default = "default_top_n_games")]
    pub top_n_games: usize,
    /// Ranked-list endpoint base.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Display-name lookup endpoint base.
    #[serde(default = "default_store_url")]
    pub store_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            top_n_games: default_top_n_games(),
            base_url: default_base_url(),
            store_url: default_store_url(),
        }
    }
}

fn default_daily_file_glob() -> String {
    "*May*2022*/*.csv".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_top_n_games() -> usize {
    10
}

fn default_base_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_store_url() -> String {
    "https://store.steampowered.com/api/appdetails".to_string()
}

impl Config {
    /// Read and validate the configuration document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SynthError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would silently change simulation semantics.
    pub fn validate(&self) -> Result<()> {
        if self.avg_session_duration_min <= 0.0 {
            return Err(SynthError::Config(
                "avg_session_duration_min must be positive".to_string(),
            ));
        }
        if self.max_sessions_per_day == 0 {
            return Err(SynthError::Config(
                "max_sessions_per_day must be at least 1".to_string(),
            ));
        }
        if self.session_duration_min <= 0 {
            return Err(SynthError::Config(
                "session_duration_min must be positive".to_string(),
            ));
        }
        if self.session_duration_max < self.session_duration_min {
            return Err(SynthError::Config(format!(
                "session_duration_max ({}) is below session_duration_min ({})",
                self.session_duration_max, self.session_duration_min
            )));
        }
        if !(0.0..=1.0).contains(&self.session_count_noise) {
            return Err(SynthError::Config(
                "session_count_noise must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=23.0).contains(&self.session_peak_hour) {
            return Err(SynthError::Config(
                "session_peak_hour must be within [0, 23]".to_string(),
            ));
        }
        if self.session_peak_stddev < 0.0 {
            return Err(SynthError::Config(
                "session_peak_stddev must not be negative".to_string(),
            ));
        }
        if self.session_generation.num_users == 0 {
            return Err(SynthError::Config(
                "session_generation.num_users must be at least 1".to_string(),
            ));
        }
        if self.session_generation.simulation_days == 0 {
            return Err(SynthError::Config(
                "session_generation.simulation_days must be at least 1".to_string(),
            ));
        }
        if self.catalog.top_n_games == 0 {
            return Err(SynthError::Config(
                "catalog.top_n_games must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const VALID_YAML: &str = r#"
data_dir: data
cleaned_data_file: data/cleaned_gaming_data.csv
database_file: output/gaming_sessions.db
avg_session_duration_min: 30.0
max_sessions_per_day: 10000
session_duration_min: 15
session_duration_max: 120
session_count_noise: 0.2
session_peak_hour: 19.0
session_peak_stddev: 3.0
session_generation:
  num_users: 500
  simulation_days: 30
  start_date: 2022-05-01
  target_session_count: 10000
"#;

    fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", yaml).unwrap();
        path
    }

    fn parse(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, VALID_YAML);

        let config = Config::load(&path).expect("should load");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.session_generation.num_users, 500);
        assert_eq!(
            config.session_generation.start_date,
            NaiveDate::from_ymd_opt(2022, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_documented_defaults_applied() {
        let config = parse(VALID_YAML);
        assert_eq!(config.daily_file_glob, "*May*2022*/*.csv");
        assert_eq!(config.session_generation.seed, 42);
        assert_eq!(config.catalog.top_n_games, 10);
    }

    #[test]
    fn test_missing_file_is_config_read_error() {
        let err = Config::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, SynthError::ConfigRead { .. }));
    }

    #[test]
    fn test_missing_required_key_fails_early() {
        // Strip the database_file line entirely.
        let yaml: String = VALID_YAML
            .lines()
            .filter(|l| !l.starts_with("database_file"))
            .collect::<Vec<_>>()
            .join("\n");
        let result: std::result::Result<Config, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err(), "missing required key must not default");
    }

    #[test]
    fn test_validate_rejects_zero_average_duration() {
        let mut config = parse(VALID_YAML);
        config.avg_session_duration_min = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("avg_session_duration_min"));
    }

    #[test]
    fn test_validate_rejects_inverted_duration_bounds() {
        let mut config = parse(VALID_YAML);
        config.session_duration_min = 120;
        config.session_duration_max = 15;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session_duration_max"));
    }

    #[test]
    fn test_validate_rejects_noise_out_of_range() {
        let mut config = parse(VALID_YAML);
        config.session_count_noise = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_peak_hour_out_of_range() {
        let mut config = parse(VALID_YAML);
        config.session_peak_hour = 25.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_user_pool() {
        let mut config = parse(VALID_YAML);
        config.session_generation.num_users = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fixed_duration_when_bounds_equal() {
        let mut config = parse(VALID_YAML);
        config.session_duration_min = 30;
        config.session_duration_max = 30;
        assert!(config.validate().is_ok());
    }
}
