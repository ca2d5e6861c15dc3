mod bootstrap;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use synth_core::config::Config;
use synth_core::settings::Settings;
use synth_data::catalog::CatalogClient;
use synth_data::loader::load_daily_data;
use synth_data::weights::{compute_weights, load_weight_inputs};
use synth_sim::cleaning::clean_sessions;
use synth_sim::expand::{expand_sessions, ExpandParams};
use synth_sim::simulate::{simulate_sessions, SimulateParams};
use synth_store::catalog::{init_catalog_schema, persist_catalog_batch};
use synth_store::csv_sink::write_daily_csv;
use synth_store::sessions::replace_session_logs;
use synth_store::Database;

fn main() -> Result<()> {
    let settings = Settings::from_args();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("playsynth v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mode: {}, Config: {:?}", settings.mode, settings.config);

    let mut config = Config::load(&settings.config)?;
    if let Some(data_dir) = &settings.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(seed) = settings.seed {
        config.session_generation.seed = seed;
    }

    bootstrap::ensure_output_dirs(&config)?;

    match settings.mode.as_str() {
        "export" => {
            let records = load_daily_data(&config.data_dir, &config.daily_file_glob)?;
            let written = write_daily_csv(&config.cleaned_data_file, &records)?;
            tracing::info!(
                "Exported {} cleaned rows to {:?}",
                written,
                config.cleaned_data_file
            );
        }

        "expand" => {
            let records = load_daily_data(&config.data_dir, &config.daily_file_glob)?;
            tracing::info!("Loaded {} daily records", records.len());

            let params = ExpandParams::from_config(&config);
            // A fixed seed makes the count noise and all sampling reproducible;
            // without --seed each run draws fresh entropy.
            let mut rng = match settings.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };

            let sessions = expand_sessions(&records, &params, &mut rng)?;
            tracing::info!("Expanded into {} raw sessions", sessions.len());

            let report = clean_sessions(sessions);
            let mut db = Database::open(&config.database_file)?;
            let stored = replace_session_logs(&mut db, &report.sessions)?;
            tracing::info!("Stored {} sessions ({} removed)", stored, report.removed);
        }

        "simulate" => {
            let pairs = load_weight_inputs(&config.data_dir)?;
            let weights = compute_weights(&pairs)?;
            tracing::info!("Computed popularity weights for {} games", weights.len());

            let params = SimulateParams::from_config(&config);
            let sessions = simulate_sessions(&weights, &params)?;
            tracing::info!("Simulated {} raw sessions", sessions.len());

            let report = clean_sessions(sessions);
            let mut db = Database::open(&config.database_file)?;
            let stored = replace_session_logs(&mut db, &report.sessions)?;
            tracing::info!("Stored {} sessions ({} removed)", stored, report.removed);
        }

        "fetch" => {
            let api_key = CatalogClient::api_key_from_env()?;
            let client = CatalogClient::new(&config.catalog, api_key)?;

            let batch = client.build_batch(config.catalog.top_n_games)?;
            tracing::info!("Fetched catalog batch of {} games", batch.games.len());

            let mut db = Database::open(&config.database_file)?;
            init_catalog_schema(&mut db)?;
            let written = persist_catalog_batch(&mut db, &batch)?;
            tracing::info!("Recorded {} player-count observations", written);
        }

        unknown => {
            // value_parser rejects unknown modes; this arm is unreachable via
            // the CLI but keeps the match total.
            anyhow::bail!("unknown mode: {}", unknown);
        }
    }

    Ok(())
}
