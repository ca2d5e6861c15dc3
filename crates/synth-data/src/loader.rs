//! Daily CSV export discovery and loading.
//!
//! Export files live in dated subdirectories (`data/3_May_2022/…`) with the
//! observation date embedded in the file name (`3_May_2022.csv`). Files that
//! fail the name pattern, are empty, or are missing required columns are
//! skipped; a run only fails when nothing usable remains at all.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use synth_core::models::DailyGameRecord;
use synth_core::normalize::{
    map_columns, COL_HOURS_PLAYED, COL_ID, COL_NAME, COL_PEAK_PLAYERS, DAILY_REQUIRED,
};
use synth_core::numeric::clean_numeric;
use synth_core::{Result, SynthError};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all files under `data_dir` matching `pattern`, sorted by path.
///
/// `pattern` is a glob relative to `data_dir`, e.g. `*May*2022*/*.csv`.
pub fn find_daily_files(data_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !data_dir.exists() {
        return Err(SynthError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let full_pattern = data_dir.join(pattern).to_string_lossy().into_owned();
    let paths = glob::glob(&full_pattern)
        .map_err(|e| SynthError::Config(format!("invalid daily_file_glob '{}': {}", pattern, e)))?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Parse the day/month-name/year triple embedded in a file name.
///
/// Accepts names like `3_May_2022.csv` (with optional trailing whitespace
/// before the extension, which some exports carry). Returns `None` for
/// non-matching names or impossible dates; the caller skips those files.
pub fn parse_file_date(file_name: &str) -> Option<NaiveDate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})_([A-Za-z]+)_(\d{4})\s*\.csv$").expect("static regex")
    });

    let caps = re.captures(file_name)?;
    let composed = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&composed, "%d %B %Y").ok()
}

/// Load every matching daily export under `data_dir` into one aggregate table.
///
/// Per-file and per-row failures are skipped and counted; the two fatal
/// conditions are an empty glob result ([`SynthError::NoInputFiles`]) and
/// zero surviving rows ([`SynthError::NoUsableRows`]).
pub fn load_daily_data(data_dir: &Path, pattern: &str) -> Result<Vec<DailyGameRecord>> {
    let files = find_daily_files(data_dir, pattern)?;
    if files.is_empty() {
        return Err(SynthError::NoInputFiles(
            data_dir.join(pattern).to_string_lossy().into_owned(),
        ));
    }

    let mut records: Vec<DailyGameRecord> = Vec::new();
    let mut files_skipped = 0usize;
    let mut rows_dropped = 0usize;

    for path in &files {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                files_skipped += 1;
                continue;
            }
        };

        let Some(date) = parse_file_date(file_name) else {
            debug!("Skipping {}: name does not match the date pattern", file_name);
            files_skipped += 1;
            continue;
        };

        match load_single_file(path, date) {
            Ok(FileRows { rows, dropped }) if !rows.is_empty() || dropped > 0 => {
                rows_dropped += dropped;
                records.extend(rows);
            }
            Ok(_) => {
                // Headers only or truly empty.
                debug!("Skipping {}: no data rows", file_name);
                files_skipped += 1;
            }
            Err(reason) => {
                warn!("Skipping {}: {}", file_name, reason);
                files_skipped += 1;
            }
        }
    }

    if files_skipped > 0 || rows_dropped > 0 {
        warn!(
            "Loaded {} rows from {} files ({} files skipped, {} rows dropped)",
            records.len(),
            files.len() - files_skipped,
            files_skipped,
            rows_dropped,
        );
    } else {
        debug!("Loaded {} rows from {} files", records.len(), files.len());
    }

    if records.is_empty() {
        return Err(SynthError::NoUsableRows);
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

struct FileRows {
    rows: Vec<DailyGameRecord>,
    dropped: usize,
}

/// Load one export file. The error string names the skip reason; per-row
/// problems are only counted, never escalated.
fn load_single_file(path: &Path, date: NaiveDate) -> std::result::Result<FileRows, String> {
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

    if headers.is_empty() {
        return Err("empty file".to_string());
    }

    let Some(columns) = map_columns(&headers, DAILY_REQUIRED) else {
        return Err("missing required columns".to_string());
    };

    let id_idx = columns[COL_ID];
    let name_idx = columns[COL_NAME];
    let peak_idx = columns[COL_PEAK_PLAYERS];
    let hours_idx = columns[COL_HOURS_PLAYED];

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let peak_players = clean_numeric(field(peak_idx)).as_u64();
        let hours_played = clean_numeric(field(hours_idx)).as_f64();

        match (peak_players, hours_played) {
            (Some(peak_players), Some(hours_played)) => rows.push(DailyGameRecord {
                game_id: field(id_idx).to_string(),
                game_name: field(name_idx).to_string(),
                date,
                peak_players,
                hours_played,
            }),
            _ => dropped += 1,
        }
    }

    Ok(FileRows { rows, dropped })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
