use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds since the Unix epoch, the resolution RedisTimeSeries keys on.
pub type TimestampMs = i64;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("sample at {timestamp_ms} has non-numeric value {raw:?}")]
    NotNumeric { timestamp_ms: TimestampMs, raw: String },
}

/// One reading of the tracked cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp_ms: TimestampMs,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: TimestampMs, value: f64) -> Self {
        Self { timestamp_ms, value }
    }

    /// Stamp `value` with the current wall-clock time.
    pub fn now(value: f64) -> Self {
        Self::new(Utc::now().timestamp_millis(), value)
    }

    /// Converts one `TS.RANGE`/`TS.REVRANGE` row. The module replies with the
    /// value as a string under RESP2, e.g. `[1718000000000, "42"]`.
    pub fn from_reply(timestamp_ms: TimestampMs, raw: &str) -> Result<Self, RecordError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::NotNumeric {
                timestamp_ms,
                raw: raw.to_string(),
            })?;

        Ok(Self::new(timestamp_ms, value))
    }
}

/// Converts a `TS.REVRANGE` reply (newest first) into samples in ascending time order.
pub fn samples_from_reverse_reply(rows: Vec<(TimestampMs, String)>) -> Result<Vec<Sample>, RecordError> {
    let mut samples = rows
        .iter()
        .map(|(ts, raw)| Sample::from_reply(*ts, raw))
        .collect::<Result<Vec<_>, _>>()?;
    samples.reverse();

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", 42.0)]
    #[case("3.5", 3.5)]
    #[case(" 17 ", 17.0)]
    #[case("-2", -2.0)]
    fn parses_reply_values(#[case] raw: &str, #[case] expected: f64) {
        let sample = Sample::from_reply(1_000, raw).unwrap();
        assert_eq!(sample, Sample::new(1_000, expected));
    }

    #[test]
    fn rejects_non_numeric_reply() {
        let err = Sample::from_reply(5, "n/a").unwrap_err();
        assert_eq!(
            err,
            RecordError::NotNumeric {
                timestamp_ms: 5,
                raw: "n/a".to_string()
            }
        );
    }

    #[test]
    fn reverse_reply_becomes_ascending() {
        let rows = vec![
            (3_000, "3".to_string()),
            (2_000, "2".to_string()),
            (1_000, "1".to_string()),
        ];
        let samples = samples_from_reverse_reply(rows).unwrap();

        let stamps: Vec<_> = samples.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(stamps, vec![1_000, 2_000, 3_000]);
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn now_uses_millisecond_clock() {
        let before = Utc::now().timestamp_millis();
        let sample = Sample::now(1.0);
        let after = Utc::now().timestamp_millis();

        assert!(sample.timestamp_ms >= before && sample.timestamp_ms <= after);
        assert_eq!(sample.value, 1.0);
    }

    #[test]
    fn serializes_as_plain_pair() {
        let json = serde_json::to_string(&Sample::new(7, 1.5)).unwrap();
        assert_eq!(json, r#"{"timestamp_ms":7,"value":1.5}"#);
    }
}
