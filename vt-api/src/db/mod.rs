//! Storage query layer for vt-api
//!
//! Thin sqlx query modules over the schema owned by `vt_common::db`. All
//! mutation here is append-only except the rating upsert; storage errors
//! propagate unmodified and retries are the caller's policy.

pub mod predictions;
pub mod ratings;
pub mod runs;
pub mod samples;
