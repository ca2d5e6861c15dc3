//! Game popularity weights.
//!
//! The population-weighted simulation needs a relative popularity score per
//! game. We take the arithmetic mean of each game's peak-player counts across
//! every observed file and assign a dense rank (ascending, ties share a
//! rank); the rank is the weight.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use synth_core::models::GameWeights;
use synth_core::normalize::{map_columns, COL_NAME, COL_PEAK_PLAYERS, WEIGHT_REQUIRED};
use synth_core::numeric::clean_numeric;
use synth_core::{Result, SynthError};
use tracing::{debug, warn};

// ── Input loading ─────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_dir`, sorted by path.
pub fn find_weight_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data path does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load `(game_name, peak_players)` pairs from every CSV under `data_dir`.
///
/// Only the `name` and `peak_players` canonical columns are required here;
/// files missing either are skipped with a warning, as are rows whose peak
/// value fails numeric cleaning.
pub fn load_weight_inputs(data_dir: &Path) -> Result<Vec<(String, u64)>> {
    if !data_dir.is_dir() {
        return Err(SynthError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let files = find_weight_files(data_dir);
    if files.is_empty() {
        return Err(SynthError::NoInputFiles(
            data_dir.join("**/*.csv").to_string_lossy().into_owned(),
        ));
    }

    let mut pairs: Vec<(String, u64)> = Vec::new();
    let mut files_used = 0usize;

    for path in &files {
        match load_pairs_from_file(path) {
            Ok(mut file_pairs) if !file_pairs.is_empty() => {
                files_used += 1;
                pairs.append(&mut file_pairs);
            }
            Ok(_) => debug!("No usable rows in {}", path.display()),
            Err(reason) => warn!("Skipping {}: {}", path.display(), reason),
        }
    }

    debug!(
        "Extracted {} name/peak pairs from {} of {} files",
        pairs.len(),
        files_used,
        files.len()
    );

    if pairs.is_empty() {
        return Err(SynthError::NoUsableRows);
    }

    Ok(pairs)
}

fn load_pairs_from_file(path: &Path) -> std::result::Result<Vec<(String, u64)>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("cannot open: {}", e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("cannot read headers: {}", e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let Some(columns) = map_columns(&headers, WEIGHT_REQUIRED) else {
        return Err("missing name/peak_players columns".to_string());
    };

    let name_idx = columns[COL_NAME];
    let peak_idx = columns[COL_PEAK_PLAYERS];

    let mut pairs = Vec::new();
    for record in reader.records().filter_map(|r| r.ok()) {
        let name = record.get(name_idx).unwrap_or("").trim();
        let peak = clean_numeric(record.get(peak_idx).unwrap_or("").trim()).as_u64();
        if let (false, Some(peak)) = (name.is_empty(), peak) {
            pairs.push((name.to_string(), peak));
        }
    }

    Ok(pairs)
}

// ── Weight computation ────────────────────────────────────────────────────────

/// Compute dense-rank popularity weights from `(game_name, peak_players)`
/// pairs.
///
/// Games are grouped by name, averaged, and ranked ascending by mean peak:
/// the least popular distinct mean gets weight 1.0, ties share a rank, and
/// the next distinct mean takes the immediately following integer.
pub fn compute_weights(pairs: &[(String, u64)]) -> Result<GameWeights> {
    if pairs.is_empty() {
        return Err(SynthError::NoGames(
            "no rows to compute weights from".to_string(),
        ));
    }

    // Group: name → (sum, count).
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for (name, peak) in pairs {
        let entry = groups.entry(name.as_str()).or_insert((0, 0));
        entry.0 += peak;
        entry.1 += 1;
    }

    let means: BTreeMap<&str, f64> = groups
        .into_iter()
        .map(|(name, (sum, count))| (name, sum as f64 / count as f64))
        .collect();

    // Dense rank over the distinct means, ascending.
    let mut distinct: Vec<f64> = means.values().copied().collect();
    distinct.sort_by(|a, b| a.partial_cmp(b).expect("means are finite"));
    distinct.dedup();

    let weights: GameWeights = means
        .into_iter()
        .map(|(name, mean)| {
            let rank = distinct
                .iter()
                .position(|m| (*m - mean).abs() < f64::EPSILON)
                .expect("mean present in distinct list");
            (name.to_string(), (rank + 1) as f64)
        })
        .collect();

    debug!("Calculated weights for {} unique games", weights.len());
    Ok(weights)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
