use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the playsynth pipeline.
#[derive(Error, Debug)]
pub enum SynthError {
    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration document could not be read from disk.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document could not be parsed as YAML.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The configured data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// The daily-file glob matched no files at all.
    #[error("No daily CSV files found matching pattern: {0}")]
    NoInputFiles(String),

    /// Every matched file or row was filtered out during loading.
    #[error("No usable rows survived loading and cleaning")]
    NoUsableRows,

    /// Synthesis has nothing to sample from.
    #[error("Nothing to synthesize: {0}")]
    NoGames(String),

    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error from the SQLite store.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The external catalog service failed outright.
    #[error("Catalog service error: {0}")]
    Http(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the playsynth crates.
pub type Result<T> = std::result::Result<T, SynthError>;

impl SynthError {
    /// True for the input-discovery error class, which callers report
    /// separately from configuration errors.
    pub fn is_input_discovery(&self) -> bool {
        matches!(
            self,
            SynthError::DataPathNotFound(_)
                | SynthError::NoInputFiles(_)
                | SynthError::NoUsableRows
        )
    }
}
