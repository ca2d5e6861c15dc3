use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use synth_core::config::Config;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is one of the conventional upper-case level names and is mapped
/// to a [`tracing_subscriber::EnvFilter`] directive. Falls back to `"info"`
/// if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

/// Map the conventional upper-case level names onto tracing directives.
/// `CRITICAL` has no tracing equivalent above `error`, so it maps there.
fn normalise_level(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => return log_level.to_string(),
    }
    .to_string()
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the parent directories of every configured output path exist.
pub fn ensure_output_dirs(config: &Config) -> anyhow::Result<()> {
    for path in [&config.cleaned_data_file, &config.database_file] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
