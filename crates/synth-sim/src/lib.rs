//! Session synthesis for playsynth.
//!
//! Two deliberately distinct strategies produce [`SessionRecord`]s from
//! aggregate statistics: per-record expansion of daily hours-played figures
//! ([`expand`]) and a population-weighted whole-window simulation
//! ([`simulate`]). A [`cleaning`] pass runs after either one.
//!
//! [`SessionRecord`]: synth_core::models::SessionRecord

pub mod cleaning;
pub mod expand;
pub mod simulate;
