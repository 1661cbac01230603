//! Utility functions and helpers for configuration

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serde helper module for Duration serialization as seconds.
///
/// Deserialization accepts either an integer number of seconds or a string
/// with an `s`, `m` or `h` suffix (`"900"`, `"15m"`, `"1h"`).
pub mod serde_duration {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(seconds) => Ok(Duration::from_secs(seconds)),
            RawDuration::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
        }
    }
}

/// Parse `"90"`, `"90s"`, `"15m"` or `"1h"` into a Duration
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let (digits, multiplier) = match text.char_indices().last() {
        Some((idx, 's')) => (&text[..idx], 1),
        Some((idx, 'm')) => (&text[..idx], 60),
        Some((idx, 'h')) => (&text[..idx], 3600),
        _ => (text, 1),
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{}'", text))?;
    let seconds = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration '{}' too large", text))?;
    Ok(Duration::from_secs(seconds))
}

/// Default functions for serde
pub fn default_true() -> bool {
    true
}
