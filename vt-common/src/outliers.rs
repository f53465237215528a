//! Statistical outlier classification
//!
//! Two interchangeable dispersion-based methods over an ordered series:
//! an IQR fence (box-plot rule) and a Z-score distance from the mean. Both
//! shipped at different points in the product's history, so both stay
//! addressable; the active default is a deployment setting.
//!
//! The functions here are pure: same input ordering, same output, no
//! mutation.

use serde::{Deserialize, Serialize};

/// Default Z-score distance beyond which a point is flagged
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// IQR fence multiplier (the usual box-plot 1.5)
pub const IQR_FENCE_MULTIPLIER: f64 = 1.5;

/// Outlier classification method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    /// Flag points outside `Q1 - 1.5*IQR .. Q3 + 1.5*IQR`
    IqrFence,
    /// Flag points with `|y - mean| > threshold * population std`
    ZScore,
}

impl Method {
    /// Identifier stored in the `outlier_runs.method` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::IqrFence => "IQR_FENCE",
            Method::ZScore => "Z_SCORE",
        }
    }

    /// Parse a stored identifier, `None` if unrecognized
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "IQR_FENCE" => Some(Method::IqrFence),
            "Z_SCORE" => Some(Method::ZScore),
            _ => None,
        }
    }
}

/// One point of a coerced series: X is UNIX seconds, Y the coerced value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

/// Classify a series, returning the X values of flagged points
///
/// Thin wrapper over [`flagged_indices`] for callers that only need the
/// X-axis positions (the wire shape of the outliers endpoint).
pub fn classify(points: &[SeriesPoint], method: Method) -> Vec<f64> {
    let values: Vec<f64> = points.iter().map(|p| p.y).collect();
    flagged_indices(&values, method)
        .into_iter()
        .map(|i| points[i].x)
        .collect()
}

/// Classify by value, returning indices of flagged points
///
/// Fewer than 2 values cannot define spread, and zero spread (all values
/// identical) means nothing is an outlier; both return an empty set rather
/// than an error.
pub fn flagged_indices(values: &[f64], method: Method) -> Vec<usize> {
    if values.len() < 2 {
        return Vec::new();
    }

    match method {
        Method::IqrFence => iqr_fence_indices(values),
        Method::ZScore => z_score_indices(values, DEFAULT_Z_THRESHOLD),
    }
}

fn iqr_fence_indices(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    if iqr == 0.0 {
        return Vec::new();
    }

    let lower = q1 - IQR_FENCE_MULTIPLIER * iqr;
    let upper = q3 + IQR_FENCE_MULTIPLIER * iqr;

    values
        .iter()
        .enumerate()
        .filter(|(_, &y)| y < lower || y > upper)
        .map(|(i, _)| i)
        .collect()
}

fn z_score_indices(values: &[f64], threshold: f64) -> Vec<usize> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    // Population standard deviation (ddof = 0)
    let std_dev = (values.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, &y)| ((y - mean) / std_dev).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Linear-interpolation quantile of an ascending-sorted slice
///
/// Matches the classic `(n-1)*q` positional definition: the fractional
/// position interpolates between the two surrounding order statistics.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
