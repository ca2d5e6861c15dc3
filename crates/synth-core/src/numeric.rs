//! Loose numeric-string coercion.
//!
//! The daily exports quote large numbers and use thousands separators
//! (`"1,234,567"`). Values that fail to parse become [`CleanNumber::Missing`]
//! so downstream row-filtering can drop them; a missing value never turns
//! into a zero.

/// Result of cleaning one loosely-formatted numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanNumber {
    Int(i64),
    Float(f64),
    /// Parse failure sentinel; propagates through aggregation as "absent".
    Missing,
}

impl CleanNumber {
    /// Numeric value as `f64`, or `None` when missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CleanNumber::Int(v) => Some(*v as f64),
            CleanNumber::Float(v) => Some(*v),
            CleanNumber::Missing => None,
        }
    }

    /// Non-negative integer value, or `None` when missing or negative.
    /// Floats are truncated.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            CleanNumber::Int(v) if *v >= 0 => Some(*v as u64),
            CleanNumber::Float(v) if *v >= 0.0 => Some(v.trunc() as u64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CleanNumber::Missing)
    }
}

/// Clean one raw field: strip quotes and thousands-separator commas, then
/// parse as integer when no decimal point is present, else as float.
///
/// Returns [`CleanNumber::Missing`] on parse failure instead of an error so
/// that a single bad cell only costs its row.
pub fn clean_numeric(raw: &str) -> CleanNumber {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '"' && *c != '\'' && *c != ',')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return CleanNumber::Missing;
    }

    if cleaned.contains('.') {
        match cleaned.parse::<f64>() {
            Ok(v) => CleanNumber::Float(v),
            Err(_) => CleanNumber::Missing,
        }
    } else {
        match cleaned.parse::<i64>() {
            Ok(v) => CleanNumber::Int(v),
            Err(_) => CleanNumber::Missing,
        }
    }
}
