//! Lenient (de)serialization helpers for the timestamps and dates the backend sends.
//!
//! The backend is not consistent about time formats: trend samples carry RFC 3339 strings,
//! naive `YYYY-MM-DD HH:MM:SS` strings or unix epochs, and prediction payloads carry bare dates.
//! Everything without an explicit offset is interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Epoch values above this are taken to be milliseconds rather than seconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Epoch(i64),
    EpochFloat(f64),
    Text(String),
}

impl RawTime {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTime::Epoch(value) => from_epoch(*value),
            RawTime::EpochFloat(value) => from_epoch(value.round() as i64),
            RawTime::Text(text) => parse_timestamp(text),
        }
    }

    fn to_date(&self) -> Option<NaiveDate> {
        match self {
            RawTime::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .ok()
                .or_else(|| parse_timestamp(text).map(|dt| dt.date_naive())),
            other => other.to_datetime().map(|dt| dt.date_naive()),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawTime::Epoch(value) => value.to_string(),
            RawTime::EpochFloat(value) => value.to_string(),
            RawTime::Text(text) => format!("\"{}\"", text),
        }
    }
}

/// Parses a textual timestamp in any of the formats the backend is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a unix epoch in seconds or milliseconds.
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.unsigned_abs() >= MILLIS_THRESHOLD.unsigned_abs() {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTime::deserialize(deserializer)?;
    raw.to_datetime()
        .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp {}", raw.describe())))
}

pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTime>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw
            .to_datetime()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp {}", raw.describe()))),
    }
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTime::deserialize(deserializer)?;
    raw.to_date()
        .ok_or_else(|| de::Error::custom(format!("unrecognised date {}", raw.describe())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-01T10:00:00Z", 2024, 1, 1, 10)]
    #[case("2024-01-01T10:00:00+02:00", 2024, 1, 1, 8)]
    #[case("2024-01-01T10:00:00.250", 2024, 1, 1, 10)]
    #[case("2024-01-01 23:00:00", 2024, 1, 1, 23)]
    #[case("2024-03-05", 2024, 3, 5, 0)]
    fn test_parse_timestamp_formats(
        #[case] raw: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] hour: u32,
    ) {
        let parsed = parse_timestamp(raw).expect("timestamp should parse");
        let expected_date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(parsed.date_naive(), expected_date);
        assert_eq!(parsed.format("%H").to_string(), format!("{:02}", hour));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_epoch_seconds_and_millis_agree() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(from_epoch(expected.timestamp()), Some(expected));
        assert_eq!(from_epoch(expected.timestamp_millis()), Some(expected));
    }

    #[test]
    fn test_epoch_out_of_range_is_rejected() {
        assert_eq!(from_epoch(i64::MIN), None);
        assert_eq!(from_epoch(i64::MAX), None);

        let result = serde_json::from_str::<Sample>(r#"{"at": -1e30, "day": "2024-01-01"}"#);
        assert!(result.is_err());
    }

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_timestamp")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        seen: Option<DateTime<Utc>>,
        #[serde(deserialize_with = "deserialize_date")]
        day: NaiveDate,
    }

    #[test]
    fn test_deserialize_mixed_representations() {
        let sample: Sample =
            serde_json::from_str(r#"{"at": 1704067200, "day": "2024-01-01T18:30:00Z"}"#).unwrap();
        assert_eq!(sample.at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(sample.seen.is_none());
        assert_eq!(sample.day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_deserialize_invalid_timestamp_fails() {
        let result = serde_json::from_str::<Sample>(r#"{"at": "soon", "day": "2024-01-01"}"#);
        assert!(result.is_err());
    }
}
