use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Synthesize per-user game session logs from daily player-count exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "playsynth",
    about = "Synthesize per-user game session logs from daily player-count exports",
    version
)]
pub struct Settings {
    /// Pipeline mode
    #[arg(long, default_value = "expand", value_parser = ["export", "expand", "simulate", "fetch"])]
    pub mode: String,

    /// Path to the YAML configuration document
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Override the data directory from the config
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Override the RNG seed (fixes Mode A noise as well)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and resolve flag interactions.
    pub fn from_args() -> Self {
        Self::resolve(Settings::parse())
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["playsynth"]);

        assert_eq!(settings.mode, "expand");
        assert_eq!(settings.config, PathBuf::from("config.yaml"));
        assert!(settings.data_dir.is_none());
        assert!(settings.seed.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_explicit_mode() {
        let settings = Settings::parse_from(["playsynth", "--mode", "simulate"]);
        assert_eq!(settings.mode, "simulate");
    }

    #[test]
    fn test_settings_rejects_unknown_mode() {
        let result = Settings::try_parse_from(["playsynth", "--mode", "stream"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_seed_override() {
        let settings = Settings::parse_from(["playsynth", "--seed", "7"]);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings = Settings::resolve(Settings::parse_from(["playsynth", "--debug"]));
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_settings_config_path() {
        let settings = Settings::parse_from(["playsynth", "--config", "/etc/playsynth.yaml"]);
        assert_eq!(settings.config, PathBuf::from("/etc/playsynth.yaml"));
    }
}
