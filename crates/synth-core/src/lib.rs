//! Core library for playsynth: shared models, error type, configuration,
//! and the header/number cleanup primitives used by the data layer.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod numeric;
pub mod settings;

pub use error::{Result, SynthError};
