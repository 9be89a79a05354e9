//! Normalization of raw date-like cells into calendar dates.
//!
//! Order exports store dates either as resolved dates or as spreadsheet serial day offsets
//! (possibly carrying a time-of-day fraction). Text cells are accepted too, since CSV exports
//! may contain serials as text or dates as `YYYY-MM-DD` / `M/D/YYYY`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DateSystem, RawValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateError {
    #[error("date field is empty")]
    Missing,
    #[error("unrecognized date value {0:?}")]
    Malformed(String),
    #[error("day offset {0} does not map to a calendar date")]
    OutOfRange(f64),
}

/// Preferred order for ambiguous numeric dates like `01/02/2024`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrder {
    /// Month / day / year (e.g. `12/31/2024`).
    Mdy,
    /// Day / month / year (e.g. `31/12/2024`).
    Dmy,
}

impl Default for DateOrder {
    fn default() -> Self {
        DateOrder::Mdy
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateParseOptions {
    pub system: DateSystem,
    pub order: DateOrder,
}

/// Resolve a raw cell to a calendar date.
///
/// Already-resolved dates pass through unchanged, so normalizing a normalized value is a no-op.
pub fn normalize_date(raw: &RawValue, options: DateParseOptions) -> Result<NaiveDate, DateError> {
    match raw {
        RawValue::Empty => Err(DateError::Missing),
        RawValue::Date(date) => Ok(*date),
        RawValue::Number(serial) => serial_to_date(*serial, options.system),
        RawValue::Text(text) => normalize_text(text, options),
    }
}

fn serial_to_date(serial: f64, system: DateSystem) -> Result<NaiveDate, DateError> {
    if !serial.is_finite() || serial < 0.0 {
        return Err(DateError::OutOfRange(serial));
    }
    // The fractional part is the time of day; the dashboard works at day granularity.
    let day = serial.trunc();
    if day > i64::MAX as f64 {
        return Err(DateError::OutOfRange(serial));
    }
    system
        .serial_to_date(day as i64)
        .ok_or(DateError::OutOfRange(serial))
}

fn normalize_text(text: &str, options: DateParseOptions) -> Result<NaiveDate, DateError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(DateError::Missing);
    }

    // YYYYMMDD would otherwise be read as a (far out of range) serial.
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let date = NaiveDate::from_ymd_opt(
            s[0..4].parse().unwrap_or_default(),
            s[4..6].parse().unwrap_or_default(),
            s[6..8].parse().unwrap_or_default(),
        );
        if let Some(date) = date {
            return Ok(date);
        }
    }

    if let Ok(serial) = s.parse::<f64>() {
        return serial_to_date(serial, options.system);
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }

    parse_date_prefix(s, options.order).ok_or_else(|| DateError::Malformed(s.to_string()))
}

/// Parse `Y-M-D`, `Y/M/D`, or `A/B/YYYY` followed by nothing or a time component.
fn parse_date_prefix(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let date_end = s
        .bytes()
        .position(|b| !(b.is_ascii_digit() || b == b'-' || b == b'/' || b == b'.'))
        .unwrap_or(s.len());
    let (date_part, rest) = s.split_at(date_end);
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
        return None;
    }

    let parts: Vec<&str> = date_part.split(|c: char| matches!(c, '-' | '/' | '.')).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };

    if a.len() == 4 {
        return NaiveDate::from_ymd_opt(a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);
    }

    if c.len() == 4 {
        let year: i32 = c.parse().ok()?;
        let first: u32 = a.parse().ok()?;
        let second: u32 = b.parse().ok()?;
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else if second > 12 && first <= 12 {
            (first, second)
        } else {
            match order {
                DateOrder::Mdy => (first, second),
                DateOrder::Dmy => (second, first),
            }
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}
