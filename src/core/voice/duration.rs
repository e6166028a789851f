//! Duration wrapper for the voice-AI API wire format.
//!
//! The API expresses durations as strings in seconds (`"60s"`, `"0.4s"`)
//! but tolerates bare numbers and compound duration strings (`"1m30s"`)
//! on input.

use std::fmt;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A [`Duration`] that serializes as a seconds string like `"60s"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiDuration(pub Duration);

impl ApiDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    fn format_seconds(&self) -> String {
        // f64 Display drops a zero fractional part, matching the wire format
        format!("{}s", self.0.as_secs_f64())
    }
}

impl From<Duration> for ApiDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl From<ApiDuration> for Duration {
    fn from(d: ApiDuration) -> Self {
        d.0
    }
}

impl fmt::Display for ApiDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_seconds())
    }
}

impl Serialize for ApiDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format_seconds())
    }
}

impl<'de> Deserialize<'de> for ApiDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = ApiDuration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a duration as seconds or a duration string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                seconds_to_duration(v).map(ApiDuration).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ApiDuration(Duration::from_secs(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                seconds_to_duration(v as f64).map(ApiDuration).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                parse_duration(v).map(ApiDuration).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

fn seconds_to_duration(secs: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration value {secs}: {e}"))
}

/// Parse `"30"`, `"30s"`, `"0.4s"`, `"1m30s"`, `"250ms"` and the like.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    // Bare numbers are seconds
    if let Ok(secs) = s.parse::<f64>() {
        return seconds_to_duration(secs);
    }

    let mut total = 0.0f64;
    let mut number = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let unit_secs = match c {
            'h' => 3600.0,
            's' => 1.0,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                0.001
            }
            'm' => 60.0,
            _ => return Err(format!("invalid duration format: {s:?}")),
        };
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid duration format: {s:?}"))?;
        number.clear();
        total += value * unit_secs;
    }
    if !number.is_empty() {
        return Err(format!("invalid duration format: {s:?}"));
    }
    seconds_to_duration(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_whole_seconds_without_decimals() {
        let d = ApiDuration::from_secs(60);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"60s\"");
    }

    #[test]
    fn test_serializes_fractional_seconds() {
        let d = ApiDuration::from_millis(400);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"0.4s\"");
    }

    #[test]
    fn test_deserializes_numbers_as_seconds() {
        let d: ApiDuration = serde_json::from_str("30").unwrap();
        assert_eq!(d.as_duration(), Duration::from_secs(30));

        let d: ApiDuration = serde_json::from_str("1.5").unwrap();
        assert_eq!(d.as_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn test_deserializes_duration_strings() {
        let d: ApiDuration = serde_json::from_str("\"30s\"").unwrap();
        assert_eq!(d.as_duration(), Duration::from_secs(30));

        let d: ApiDuration = serde_json::from_str("\"1m30s\"").unwrap();
        assert_eq!(d.as_duration(), Duration::from_secs(90));

        let d: ApiDuration = serde_json::from_str("\"250ms\"").unwrap();
        assert_eq!(d.as_duration(), Duration::from_millis(250));

        let d: ApiDuration = serde_json::from_str("\"30\"").unwrap();
        assert_eq!(d.as_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<ApiDuration>("\"soon\"").is_err());
        assert!(serde_json::from_str::<ApiDuration>("\"-5s\"").is_err());
        assert!(serde_json::from_str::<ApiDuration>("\"\"").is_err());
    }
}
