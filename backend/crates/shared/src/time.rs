//! Record timestamps
//!
//! The backend writes timestamps as `2024-05-01 10:20:30.123Z` (space
//! separated); RFC 3339 is accepted as well. Use with
//! `#[serde(with = "kernel::time::record_timestamp")]`.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

const RECORD_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid record timestamp: {0}")]
pub struct TimestampError(String);

/// Parse a record timestamp in either accepted form
pub fn parse_record_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, RECORD_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError(raw.to_string()))
}

/// Format a timestamp the way the backend writes it
pub fn format_record_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
}

pub mod record_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_record_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_record_timestamp(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_backend_format() {
        let dt = parse_record_timestamp("2024-05-01 10:20:30.123Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_record_timestamp("2024-05-01T10:20:30+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_record_timestamp("yesterday").is_err());
        assert!(parse_record_timestamp("").is_err());
    }

    #[test]
    fn test_format_matches_backend() {
        let dt = parse_record_timestamp("2024-05-01 10:20:30.100Z").unwrap();
        assert_eq!(format_record_timestamp(&dt), "2024-05-01 10:20:30.100Z");
    }
}
