//! Metric catalog
//!
//! The enumerated set of health/fitness metric identifiers the service
//! accepts. Membership is validated at the API edge; everything downstream
//! treats the metric as an opaque partition key.

use serde::{Deserialize, Serialize};

use crate::value::ValueEncoding;

/// Recognized health/fitness metric kinds
///
/// Wire form is the SCREAMING_SNAKE identifier used by the ingestion
/// providers (e.g. `PULSE`, `SLEEP_SESSION_TIME`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    /// Heart rate, beats per minute
    Pulse,
    /// Blood oxygen saturation, percent
    BloodOxygen,
    /// Stress level index, 0-100
    StressLvl,
    /// Respiratory rate, breaths per minute
    RespiratoryRate,
    /// Sleep time, hours per night
    SleepTime,
    /// Sleep session length as an ISO-8601 duration (e.g. `PT1H10M`)
    SleepSessionTime,
    /// Step count per interval
    Steps,
    /// Body temperature, degrees Celsius
    BodyTemperature,
}

impl MetricKind {
    /// All recognized metrics, in catalog order
    pub const ALL: [MetricKind; 8] = [
        MetricKind::Pulse,
        MetricKind::BloodOxygen,
        MetricKind::StressLvl,
        MetricKind::RespiratoryRate,
        MetricKind::SleepTime,
        MetricKind::SleepSessionTime,
        MetricKind::Steps,
        MetricKind::BodyTemperature,
    ];

    /// Wire identifier stored in the `samples.metric` column
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Pulse => "PULSE",
            MetricKind::BloodOxygen => "BLOOD_OXYGEN",
            MetricKind::StressLvl => "STRESS_LVL",
            MetricKind::RespiratoryRate => "RESPIRATORY_RATE",
            MetricKind::SleepTime => "SLEEP_TIME",
            MetricKind::SleepSessionTime => "SLEEP_SESSION_TIME",
            MetricKind::Steps => "STEPS",
            MetricKind::BodyTemperature => "BODY_TEMPERATURE",
        }
    }

    /// Parse a wire identifier, `None` if unrecognized
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PULSE" => Some(MetricKind::Pulse),
            "BLOOD_OXYGEN" => Some(MetricKind::BloodOxygen),
            "STRESS_LVL" => Some(MetricKind::StressLvl),
            "RESPIRATORY_RATE" => Some(MetricKind::RespiratoryRate),
            "SLEEP_TIME" => Some(MetricKind::SleepTime),
            "SLEEP_SESSION_TIME" => Some(MetricKind::SleepSessionTime),
            "STEPS" => Some(MetricKind::Steps),
            "BODY_TEMPERATURE" => Some(MetricKind::BodyTemperature),
            _ => None,
        }
    }

    /// Value encoding this metric's providers are expected to send
    ///
    /// Informational only: coercion accepts either encoding for any metric
    /// and skips what it cannot parse.
    pub fn expected_encoding(&self) -> ValueEncoding {
        match self {
            MetricKind::SleepSessionTime => ValueEncoding::Duration,
            _ => ValueEncoding::Numeric,
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_wire_identifiers() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert_eq!(MetricKind::from_str("HEARTBEATZ"), None);
        assert_eq!(MetricKind::from_str("pulse"), None);
        assert_eq!(MetricKind::from_str(""), None);
    }

    #[test]
    fn sleep_session_expects_duration_encoding() {
        assert_eq!(
            MetricKind::SleepSessionTime.expected_encoding(),
            ValueEncoding::Duration
        );
        assert_eq!(MetricKind::Pulse.expected_encoding(), ValueEncoding::Numeric);
    }
}
