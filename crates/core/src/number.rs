//! Integer fields as written by the extractor.
//!
//! A nullable integer column comes out of the extract as floats, so `20`
//! may appear as `20.0`. Integral floats are accepted; anything with a
//! fractional part is rejected.

use crate::error::{Error, Result};

/// Parse an integer field, accepting integral floats such as `123.0`.
pub fn parse_integer(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(Error::invalid_integer(trimmed)),
    }
}

/// Serde helpers for integer columns.
pub mod serde_int {
    use serde::{Deserialize, Deserializer};

    /// Non-null integer column.
    pub fn required<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_integer(&raw).map_err(serde::de::Error::custom)
    }

    /// Empty field is null; anything else must be an integer.
    pub fn optional<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_integer(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
