//! Lenient timestamp decoding.
//!
//! Documents exported from the content store carry timestamps in several
//! shapes: RFC 3339 strings, epoch milliseconds, or `{seconds, nanoseconds}`
//! objects. A value that fits none of them decodes to `None` so a single bad
//! field never rejects the whole document.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode a timestamp from any of the shapes the store produces.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(fields) => {
            let seconds = fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// Parse an RFC 3339 timestamp, falling back to a bare calendar date.
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    parse_calendar_date(trimmed).map(start_of_day)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), CALENDAR_DATE_FORMAT).ok()
}

/// Calendar dates are pinned to midnight UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `#[serde(with = "...")]` adapter for optional timestamps.
pub mod lenient {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_timestamp))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => {
                serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }
}

/// `#[serde(with = "...")]` adapter for optional calendar dates.
///
/// Full timestamps are accepted too and truncated to their UTC date.
pub mod lenient_date {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(|value| match value {
            Value::String(raw) => parse_calendar_date(raw)
                .or_else(|| parse_timestamp_str(raw).map(|timestamp| timestamp.date_naive())),
            other => parse_timestamp(other).map(|timestamp| timestamp.date_naive()),
        }))
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(CALENDAR_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339_and_calendar_dates() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!("2025-05-01T00:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2025-05-01T02:00:00+02:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2025-05-01")), Some(expected));
    }

    #[test]
    fn test_parse_epoch_millis_and_store_objects() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let millis = expected.timestamp_millis();
        assert_eq!(parse_timestamp(&json!(millis)), Some(expected));
        assert_eq!(
            parse_timestamp(&json!({"seconds": expected.timestamp(), "nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"_seconds": expected.timestamp()})),
            Some(expected)
        );
    }

    #[test]
    fn test_malformed_values_decode_to_none() {
        assert_eq!(parse_timestamp(&json!("last tuesday")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
        assert_eq!(parse_timestamp(&json!({"minutes": 3})), None);
        assert_eq!(parse_timestamp(&Value::Null), None);
    }

    #[derive(Debug, Deserialize, serde::Serialize)]
    struct Stamped {
        #[serde(default, with = "lenient")]
        at: Option<DateTime<Utc>>,
        #[serde(default, with = "lenient_date")]
        due: Option<NaiveDate>,
    }

    #[test]
    fn test_serde_adapters_tolerate_bad_fields() {
        let parsed: Stamped = serde_json::from_value(json!({"at": "garbage", "due": 42.5})).unwrap();
        assert!(parsed.at.is_none());
        assert!(parsed.due.is_none());

        let parsed: Stamped =
            serde_json::from_value(json!({"at": "2025-05-01T10:30:00Z", "due": "2025-05-03"})).unwrap();
        assert_eq!(parsed.due, NaiveDate::from_ymd_opt(2025, 5, 3));

        let encoded = serde_json::to_value(&parsed).unwrap();
        assert_eq!(encoded["at"], json!("2025-05-01T10:30:00.000Z"));
        assert_eq!(encoded["due"], json!("2025-05-03"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let parsed: Stamped = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.at.is_none());
        assert!(parsed.due.is_none());
    }
}
