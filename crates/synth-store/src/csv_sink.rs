//! CSV export of the normalized daily dataset.

use std::path::Path;

use synth_core::models::DailyGameRecord;
use synth_core::Result;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Write the normalized records to `path`, overwriting any existing file.
///
/// Returns the number of data rows written.
pub fn write_daily_csv<P: AsRef<Path>>(path: P, records: &[DailyGameRecord]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["game_id", "game_name", "peak_players", "hours_played", "date"])?;
    for record in records {
        writer.write_record([
            record.game_id.as_str(),
            record.game_name.as_str(),
            &record.peak_players.to_string(),
            &record.hours_played.to_string(),
            &record.date.format(DATE_FORMAT).to_string(),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} cleaned rows to {:?}", records.len(), path);
    Ok(records.len())
}
