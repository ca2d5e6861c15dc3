//! Data ingestion layer for playsynth.
//!
//! Responsible for discovering and parsing the dated CSV exports, computing
//! per-game popularity weights, and talking to the external ranking/catalog
//! service.

pub mod catalog;
pub mod loader;
pub mod weights;

pub use synth_core as core;
