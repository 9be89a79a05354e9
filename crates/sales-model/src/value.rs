use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single raw cell as delivered by ingestion, before any validation.
///
/// Spreadsheet exports mix representations freely: a date column may hold serial numbers,
/// resolved dates, or text, and numeric columns may arrive as formatted text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum RawValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl RawValue {
    /// `true` for [`RawValue::Empty`] and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) | RawValue::Date(_) => false,
        }
    }

    /// Trimmed text content; numbers and dates render in their canonical form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Empty => None,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
            }
            RawValue::Number(n) => Some(Cow::Owned(n.to_string())),
            RawValue::Date(d) => Some(Cow::Owned(d.to_string())),
        }
    }

    /// Finite numeric content.
    ///
    /// Text is parsed leniently the way spreadsheet exports format numbers: grouping separators,
    /// a leading currency symbol and accounting parentheses (`(12.50)`) are accepted.
    pub fn as_number(&self, decimal_separator: char) -> Option<f64> {
        match self {
            RawValue::Number(n) => n.is_finite().then_some(*n),
            RawValue::Text(s) => parse_number(s, decimal_separator),
            RawValue::Empty | RawValue::Date(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        RawValue::Date(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Empty)
    }
}

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

pub(crate) fn parse_number(v: &str, decimal_separator: char) -> Option<f64> {
    let (sign, body) = split_sign_and_body(v);
    let body = body
        .trim_start_matches(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .trim_end_matches(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .trim();
    if body.is_empty() {
        return None;
    }

    let normalized = normalize_number(body, decimal_separator)?;
    let parsed: f64 = normalized.parse().ok()?;
    let value = parsed * sign;
    value.is_finite().then_some(value)
}

fn split_sign_and_body(mut s: &str) -> (f64, &str) {
    s = s.trim();
    let mut sign = 1.0;

    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        sign = -1.0;
        s = inner.trim();
    }

    if let Some(rest) = s.strip_prefix('-') {
        sign = -sign;
        s = rest.trim_start();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.trim_start();
    }

    (sign, s)
}

fn normalize_number(s: &str, decimal_separator: char) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut saw_digit = false;
    let mut saw_decimal = false;
    let mut saw_exp = false;

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            saw_digit = true;
            out.push(ch);
            continue;
        }

        if !saw_exp && ch == decimal_separator {
            if saw_decimal {
                return None;
            }
            saw_decimal = true;
            out.push('.');
            continue;
        }

        if !saw_exp && is_grouping_separator(ch, decimal_separator) {
            continue;
        }

        if !saw_exp && matches!(ch, 'e' | 'E') && saw_digit {
            saw_exp = true;
            out.push('e');
            continue;
        }

        // Exponent sign is only valid immediately after `e`.
        if saw_exp && matches!(ch, '+' | '-') && out.ends_with('e') {
            out.push(ch);
            continue;
        }

        return None;
    }

    if !saw_digit || out.ends_with('e') || out.ends_with('+') || out.ends_with('-') {
        return None;
    }
    Some(out)
}

fn is_grouping_separator(ch: char, decimal_separator: char) -> bool {
    match ch {
        ',' => decimal_separator != ',',
        '.' => decimal_separator != '.',
        ' ' | '\u{00A0}' | '\u{202F}' | '_' | '\'' => true,
        _ => false,
    }
}
