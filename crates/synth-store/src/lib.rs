//! Persistence layer: SQLite session/catalog sinks and the CSV exporter.

pub mod catalog;
pub mod csv_sink;
pub mod database;
pub mod sessions;

pub use database::Database;
