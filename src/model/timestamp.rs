//! Wire representation of timestamps.
//!
//! Timestamps are written as integer epoch milliseconds. Older data stored
//! them as RFC 3339 strings, so both forms are accepted when reading.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Current time truncated to millisecond precision, so that a value survives
/// a trip through the wire format unchanged.
///
pub fn now_millis() -> DateTime<Utc> {
    truncate_millis(Utc::now())
}

pub fn truncate_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(at.timestamp_millis())
        .single()
        .unwrap_or(at)
}

pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(at.timestamp_millis())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match WireTimestamp::deserialize(deserializer)? {
        WireTimestamp::Millis(millis) => from_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", millis))),
        WireTimestamp::Fractional(millis) => from_millis(millis.round() as i64)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", millis))),
        WireTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|at| truncate_millis(at.with_timezone(&Utc)))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", text, e))),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::model::timestamp")]
        at: chrono::DateTime<chrono::Utc>,
    }

    #[test]
    fn writes_epoch_millis() {
        let at = super::from_millis(1_700_000_000_123).unwrap();
        let json = serde_json::to_string(&Stamped { at }).unwrap();
        assert_eq!(json, r#"{"at":1700000000123}"#);
    }

    #[test]
    fn reads_epoch_millis_and_rfc3339() {
        let from_number: Stamped = serde_json::from_str(r#"{"at":1700000000123}"#).unwrap();
        let from_text: Stamped =
            serde_json::from_str(r#"{"at":"2023-11-14T22:13:20.123Z"}"#).unwrap();
        assert_eq!(from_number.at, from_text.at);
    }

    #[test]
    fn reads_fractional_millis() {
        let stamped: Stamped = serde_json::from_str(r#"{"at":1700000000123.0}"#).unwrap();
        assert_eq!(stamped.at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Stamped>(r#"{"at":true}"#).is_err());
    }

    #[test]
    fn now_millis_has_no_sub_millisecond_part() {
        let now = super::now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
