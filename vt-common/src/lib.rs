//! # VitalTrace Common Library
//!
//! Shared code for the VitalTrace services including:
//! - Error taxonomy
//! - Database schema and pool construction
//! - Metric catalog and sample value coercion
//! - Outlier classification algorithms
//! - Event types for the push channel
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod metric;
pub mod outliers;
pub mod value;

pub use error::{Error, Result};
pub use metric::MetricKind;
pub use outliers::Method;
pub use value::SampleValue;
