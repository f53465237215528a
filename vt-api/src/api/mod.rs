//! HTTP API handlers for vt-api

pub mod classify;
pub mod health;
pub mod ingest;
pub mod predictions;
pub mod ratings;
pub mod series;
pub mod sse;

use vt_common::{Error, MetricKind};

/// Parse a path segment into a recognized metric
///
/// Unrecognized values are an input error (400), checked before any storage
/// access.
pub(crate) fn parse_metric(raw: &str) -> Result<MetricKind, Error> {
    MetricKind::from_str(raw)
        .ok_or_else(|| Error::InvalidInput(format!("Unrecognized metric: {raw}")))
}
