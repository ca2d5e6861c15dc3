//! External ranking/catalog service client.
//!
//! The service returns a ranked list of game identifiers with peak-concurrency
//! figures, plus a per-identifier display-name lookup. Both are treated as
//! best-effort black boxes: a failed or empty name lookup falls back to a
//! synthetic placeholder instead of aborting the run, and lookups are strictly
//! serial with a fixed delay to respect the service's rate limits.
//!
//! Fetching is two-phase: [`CatalogClient::build_batch`] performs all network
//! calls and returns an immutable [`CatalogBatch`]; persistence happens
//! afterwards in one sweep, so no network call ever interleaves with a
//! database write.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use synth_core::config::CatalogConfig;
use synth_core::{Result, SynthError};
use tracing::{debug, info, warn};

const TOP_GAMES_ENDPOINT: &str = "/ISteamChartsService/GetMostPlayedGames/v1/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Delay between serial display-name lookups.
const LOOKUP_DELAY: Duration = Duration::from_millis(1500);

// ── Wire types ────────────────────────────────────────────────────────────────

/// One entry of the ranked top-games list. The list arrives rank-ordered, so
/// position encodes rank and only the id and peak figure are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedGame {
    #[serde(rename = "appid")]
    pub app_id: u64,
    #[serde(default)]
    pub peak_in_game: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RanksEnvelope {
    #[serde(default)]
    ranks: Vec<RankedGame>,
}

#[derive(Debug, Default, Deserialize)]
struct TopGamesResponse {
    #[serde(default)]
    response: RanksEnvelope,
}

// ── Batch types ───────────────────────────────────────────────────────────────

pub use synth_core::models::{CatalogBatch, CatalogGame};

/// Fallback display name used when the lookup fails or returns nothing.
pub fn placeholder_name(app_id: u64) -> String {
    format!("AppID_{}", app_id)
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct CatalogClient {
    base_url: String,
    store_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    lookup_delay: Duration,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SynthError::Http(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            store_url: config.store_url.clone(),
            api_key,
            client,
            lookup_delay: LOOKUP_DELAY,
        })
    }

    /// Read the service API key from the `STEAM_API_KEY` environment variable.
    pub fn api_key_from_env() -> Result<String> {
        std::env::var("STEAM_API_KEY").map_err(|_| {
            SynthError::Config("STEAM_API_KEY environment variable is required".to_string())
        })
    }

    /// Fetch the full ranked top-games list. A transport or decode failure
    /// here is fatal for the fetch phase (there is nothing to fall back to).
    pub fn fetch_top_games(&self) -> Result<Vec<RankedGame>> {
        let url = format!("{}{}", self.base_url, TOP_GAMES_ENDPOINT);
        debug!("Fetching ranked top-games list from {}", url);

        let body = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| SynthError::Http(format!("top-games request failed: {}", e)))?;

        parse_top_games(&body)
    }

    /// Best-effort display-name lookup. Returns `None` on any failure; the
    /// caller substitutes [`placeholder_name`] and carries on.
    pub fn lookup_name(&self, app_id: u64) -> Option<String> {
        let result = self
            .client
            .get(&self.store_url)
            .query(&[("appids", app_id.to_string())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text());

        match result {
            Ok(body) => parse_app_name(&body, app_id),
            Err(e) => {
                warn!("Name lookup failed for app {}: {}", app_id, e);
                None
            }
        }
    }

    /// Run the complete fetch phase: ranked list, truncation to `top_n`, and
    /// serial rate-limited name resolution with placeholder fallback.
    pub fn build_batch(&self, top_n: usize) -> Result<CatalogBatch> {
        let ranked = self.fetch_top_games()?;
        if ranked.is_empty() {
            warn!("Ranked list came back empty");
        }

        let selected: Vec<RankedGame> = ranked.into_iter().take(top_n).collect();
        info!("Resolving names for {} top games", selected.len());

        let mut games = Vec::with_capacity(selected.len());
        for (i, entry) in selected.iter().enumerate() {
            if i > 0 {
                std::thread::sleep(self.lookup_delay);
            }
            let name = self.lookup_name(entry.app_id).unwrap_or_else(|| {
                warn!("Using placeholder name for app {}", entry.app_id);
                placeholder_name(entry.app_id)
            });
            games.push(CatalogGame {
                app_id: entry.app_id,
                name,
                peak_in_game: entry.peak_in_game,
            });
        }

        Ok(CatalogBatch {
            fetched_at: Utc::now(),
            games,
        })
    }
}

// ── Response parsing ──────────────────────────────────────────────────────────

/// Parse the `{"response": {"ranks": [...]}}` envelope of the ranked list.
pub fn parse_top_games(body: &str) -> Result<Vec<RankedGame>> {
    let parsed: TopGamesResponse = serde_json::from_str(body)
        .map_err(|e| SynthError::Http(format!("malformed top-games response: {}", e)))?;
    Ok(parsed.response.ranks)
}

/// Extract the display name from an app-details response, which is keyed by
/// the stringified app id: `{"570": {"success": true, "data": {"name": …}}}`.
pub fn parse_app_name(body: &str, app_id: u64) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let app = value.get(app_id.to_string())?;
    if !app.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
        return None;
    }
    app.get("data")
        .and_then(|d| d.get("name"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
