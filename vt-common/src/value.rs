//! Sample value coercion
//!
//! Raw sample values arrive as text because the payload shape varies by
//! metric: most providers send plain decimals, sleep-session providers send
//! ISO-8601 durations (`PT1H10M`). Coercion resolves the text once into a
//! tagged union; everything downstream works with the resolved form instead
//! of re-parsing ad hoc.

use serde::{Deserialize, Serialize};

/// Expected encoding of a metric's raw values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueEncoding {
    /// Plain decimal string, e.g. `"72"` or `"36.6"`
    Numeric,
    /// ISO-8601 duration string, e.g. `"PT1H10M"`
    Duration,
}

/// A raw sample value resolved exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// Plain decimal value
    Numeric(f64),
    /// ISO-8601 duration converted to total seconds
    Duration(f64),
    /// Value matched neither encoding; excluded from numeric analysis
    Unparseable,
}

impl SampleValue {
    /// Coerce raw text into its resolved form
    ///
    /// Tries plain decimal first, then ISO-8601 duration. Non-finite
    /// numerics (`NaN`, `inf`) are treated as unparseable so they can never
    /// reach the classifier.
    pub fn parse(raw: &str) -> SampleValue {
        let trimmed = raw.trim();

        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return SampleValue::Numeric(n);
            }
            return SampleValue::Unparseable;
        }

        match parse_iso8601_duration_secs(trimmed) {
            Some(secs) => SampleValue::Duration(secs),
            None => SampleValue::Unparseable,
        }
    }

    /// Numeric Y value for analysis, `None` for unparseable samples
    pub fn as_y(&self) -> Option<f64> {
        match self {
            SampleValue::Numeric(n) => Some(*n),
            SampleValue::Duration(secs) => Some(*secs),
            SampleValue::Unparseable => None,
        }
    }
}

/// Parse an ISO-8601 duration into total seconds
///
/// Supports the designators the ingestion providers actually send: weeks,
/// days, hours, minutes and (possibly fractional) seconds. Calendar-relative
/// designators (years, months) have no fixed length in seconds and are
/// rejected. Days fold in at 86400 seconds each.
///
/// # Examples
///
/// ```
/// use vt_common::value::parse_iso8601_duration_secs;
///
/// assert_eq!(parse_iso8601_duration_secs("PT1H10M"), Some(4200.0));
/// assert_eq!(parse_iso8601_duration_secs("P1DT30S"), Some(86430.0));
/// assert_eq!(parse_iso8601_duration_secs("PT0.5S"), Some(0.5));
/// assert_eq!(parse_iso8601_duration_secs("P1Y"), None);
/// assert_eq!(parse_iso8601_duration_secs("not-a-duration"), None);
/// ```
pub fn parse_iso8601_duration_secs(s: &str) -> Option<f64> {
    let rest = s.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0_f64;
    let mut in_time = false;
    let mut saw_component = false;
    let mut number = String::new();

    for c in rest.chars() {
        match c {
            'T' => {
                if in_time || !number.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' | '.' => number.push(c),
            designator => {
                let n: f64 = number.parse().ok()?;
                number.clear();
                saw_component = true;

                let secs = match (designator, in_time) {
                    ('W', false) => n * 7.0 * 86400.0,
                    ('D', false) => n * 86400.0,
                    ('H', true) => n * 3600.0,
                    ('M', true) => n * 60.0,
                    ('S', true) => n,
                    // Calendar designators (Y, month-M) and misplaced units
                    _ => return None,
                };
                total += secs;
            }
        }
    }

    // Trailing digits with no designator, or a bare "PT"
    if !number.is_empty() || !saw_component {
        return None;
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_plain_decimals() {
        assert_eq!(SampleValue::parse("72"), SampleValue::Numeric(72.0));
        assert_eq!(SampleValue::parse("36.6"), SampleValue::Numeric(36.6));
        assert_eq!(SampleValue::parse(" -3.5 "), SampleValue::Numeric(-3.5));
    }

    #[test]
    fn coerces_durations_to_seconds() {
        assert_eq!(SampleValue::parse("PT1H10M"), SampleValue::Duration(4200.0));
        assert_eq!(SampleValue::parse("PT45S"), SampleValue::Duration(45.0));
        assert_eq!(
            SampleValue::parse("P2DT1H"),
            SampleValue::Duration(2.0 * 86400.0 + 3600.0)
        );
        assert_eq!(SampleValue::parse("P1W"), SampleValue::Duration(604800.0));
    }

    #[test]
    fn malformed_values_are_unparseable() {
        assert_eq!(SampleValue::parse("not-a-number"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse(""), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("P"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("PT"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("PT5"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("P3M"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("NaN"), SampleValue::Unparseable);
        assert_eq!(SampleValue::parse("inf"), SampleValue::Unparseable);
    }

    #[test]
    fn minutes_mean_months_outside_time_section() {
        // "M" before the T separator is calendar months, which have no
        // fixed second length.
        assert_eq!(parse_iso8601_duration_secs("P10M"), None);
        assert_eq!(parse_iso8601_duration_secs("PT10M"), Some(600.0));
    }

    #[test]
    fn as_y_excludes_unparseable() {
        assert_eq!(SampleValue::Numeric(1.5).as_y(), Some(1.5));
        assert_eq!(SampleValue::Duration(60.0).as_y(), Some(60.0));
        assert_eq!(SampleValue::Unparseable.as_y(), None);
    }
}
