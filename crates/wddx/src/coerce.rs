//! Scalar coercion: turning `(text, wire type name)` into a typed [`Value`].
//!
//! The decoder never interprets scalar text itself; it hands every scalar
//! element to a [`Coerce`] implementation supplied at construction time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value::{tags, DATE_TIME_FORMAT};
use crate::Value;

/// Maps raw element text plus its tag name to a value.
///
/// Implementations must not fail: an unknown `type_tag`, or text that does
/// not parse as the requested type, yields a string scalar of the raw text.
pub trait Coerce {
    fn coerce(&self, text: &str, type_tag: &str) -> Value;
}

impl<F> Coerce for F
where
    F: Fn(&str, &str) -> Value,
{
    fn coerce(&self, text: &str, type_tag: &str) -> Value {
        self(text, type_tag)
    }
}

/// Built-in coercion for `string`, `integer`, `number`, `dateTime`,
/// `boolean` and `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoercion;

impl Coerce for DefaultCoercion {
    fn coerce(&self, text: &str, type_tag: &str) -> Value {
        let coerced = match type_tag {
            tags::STRING => Some(Value::string(text)),
            tags::INTEGER => text.trim().parse::<i64>().ok().map(Value::integer),
            tags::NUMBER => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::number),
            tags::DATE_TIME => parse_date_time(text).map(Value::date_time),
            tags::BOOLEAN => parse_boolean(text).map(Value::Boolean),
            tags::NULL => Some(Value::Null),
            _ => None,
        };
        coerced.unwrap_or_else(|| {
            tracing::debug!(type_tag, "scalar kept as string");
            Value::string(text)
        })
    }
}

/// Parse WDDX-style boolean text. Accepts `true`/`false`, `yes`/`no` and
/// `1`/`0`, case-insensitively.
pub fn parse_boolean(text: &str) -> Option<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") || t.eq_ignore_ascii_case("yes") || t == "1" {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") || t.eq_ignore_ascii_case("no") || t == "0" {
        Some(false)
    } else {
        None
    }
}

/// Parse date text as an instant. Offsets are honoured; text without one is
/// taken to be UTC.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    let t = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(naive.and_utc());
        }
    }
    let date = NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Re-render date text in the wire format, if it is a date.
pub(crate) fn normalize_date_time(text: &str) -> Option<String> {
    parse_date_time(text).map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
}
