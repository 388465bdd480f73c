//! Calendar math shared by the reports.
//!
//! Month and year differences count calendar boundaries crossed, ignoring the
//! day of month: 2024-01-31 to 2024-02-01 is one month.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Date formats accepted by the loader, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Datetime formats whose time component is discarded.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Months between two dates, counted as month boundaries crossed.
///
/// Negative when `to` is before `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

/// Completed years from `birthdate` to `as_of`.
///
/// Returns `None` when the birthdate lies after `as_of`.
pub fn age_in_years(birthdate: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    as_of.years_since(birthdate)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Parse a date field. A trailing time component is accepted and dropped.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }

    Err(Error::invalid_date(trimmed))
}

/// Serde helpers for nullable date columns.
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    /// Empty field is null; anything else must parse.
    pub fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }

    /// Empty or unparsable field is null.
    pub fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| super::parse_date(&raw).ok()))
    }
}
