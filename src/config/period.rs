//! Time-period values for deadlines and timeouts.
//!
//! Accepted forms: an integer number of seconds (`5`), or a string
//! `"<amount> <unit>"` / `"<amount><unit>"` such as `"15 s"`, `"500ms"`,
//! `"1 min"`. A bare number in a string is read as seconds. Anything else is
//! an error; nothing falls back to zero.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Error for an unparseable period string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for PeriodError {}

/// Parse a period string.
pub fn parse_period(input: &str) -> Result<Duration, PeriodError> {
    let fail = |reason| PeriodError {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(split);
    if amount.is_empty() {
        return Err(fail("expected a leading whole number"));
    }
    let amount: u64 = amount.parse().map_err(|_| fail("amount out of range"))?;

    let millis_per_unit: u64 = match unit.trim() {
        "ms" | "millis" | "milliseconds" => 1,
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000,
        "d" | "day" | "days" => 86_400_000,
        _ => return Err(fail("unknown unit")),
    };

    amount
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| fail("amount out of range"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPeriod {
    Seconds(u64),
    Text(String),
}

/// `serde(with)` deserializer for a `Duration` field.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawPeriod::deserialize(deserializer)? {
        RawPeriod::Seconds(secs) => Ok(Duration::from_secs(secs)),
        RawPeriod::Text(text) => parse_period(&text).map_err(serde::de::Error::custom),
    }
}

/// `serde(with)` serializer; writes whole seconds when exact, else millis.
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = duration.as_millis();
    if millis % 1_000 == 0 {
        serializer.serialize_str(&format!("{} s", millis / 1_000))
    } else {
        serializer.serialize_str(&format!("{} ms", millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_period("5 s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_period("15s").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_period("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_period("1 min").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_period("2 hours").unwrap(), Duration::from_secs(7_200));
        assert_eq!(parse_period("1 d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_period(" 60 ").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_malformed_is_rejected() {
        assert!(parse_period("").is_err());
        assert!(parse_period("soon").is_err());
        assert!(parse_period("10 fortnights").is_err());
        assert!(parse_period("-5 s").is_err());
        assert!(parse_period("1.5 s").is_err());
        assert!(parse_period("99999999999999999999 s").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = parse_period("ten s").unwrap_err();
        assert_eq!(err.to_string(), "invalid period 'ten s': expected a leading whole number");
    }

    #[derive(Deserialize, serde::Serialize)]
    struct Holder {
        #[serde(with = "super")]
        value: Duration,
    }

    #[test]
    fn test_deserialize_integer_and_string() {
        let h: Holder = toml::from_str("value = 7").unwrap();
        assert_eq!(h.value, Duration::from_secs(7));

        let h: Holder = toml::from_str("value = \"90 s\"").unwrap();
        assert_eq!(h.value, Duration::from_secs(90));

        assert!(toml::from_str::<Holder>("value = \"ninety\"").is_err());
    }

    #[test]
    fn test_serialize() {
        let text = toml::to_string(&Holder { value: Duration::from_millis(1500) }).unwrap();
        assert_eq!(text.trim(), "value = \"1500 ms\"");
    }
}
