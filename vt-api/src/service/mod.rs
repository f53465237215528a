//! Domain services composing the storage layer
//!
//! `series` is the read façade over samples + outlier flags + predictions;
//! `classify` runs a detection pass and commits it to the iteration ledger.

pub mod classify;
pub mod series;
