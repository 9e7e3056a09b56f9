//! Token to value conversion.

use super::value::TIMESTAMP_FORMAT;
use super::{ScalarKind, Value};
use crate::settings::Settings;
use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

/// A non-nullable token could not be parsed as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {text:?} to {kind} for parameter '{parameter}'")]
pub struct ConversionError {
    /// Parameter or field being bound.
    pub parameter: String,
    /// Requested kind.
    pub kind: ScalarKind,
    /// Offending token.
    pub text: String,
}

impl ConversionError {
    /// Create a conversion error.
    pub fn new(parameter: impl Into<String>, kind: ScalarKind, text: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            kind,
            text: text.into(),
        }
    }
}

/// Parses raw tokens into scalar [`Value`]s.
///
/// Boolean vocabulary comes from [`Settings`]; every other kind uses a
/// locale-invariant format.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::{ScalarKind, TypeCoercion, Value};
///
/// let coercion = TypeCoercion::default();
///
/// let value = coercion.convert("age", ScalarKind::Int32, false, Some("21")).unwrap();
/// assert_eq!(value, Value::Int32(21));
///
/// // Nullable kinds soft-fail to absent
/// let value = coercion.convert("age", ScalarKind::Int32, true, Some("old")).unwrap();
/// assert!(value.is_absent());
///
/// assert!(coercion.convert("age", ScalarKind::Int32, false, Some("old")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TypeCoercion {
    true_literals: Vec<String>,
    false_literals: Vec<String>,
}

impl TypeCoercion {
    /// Create a coercion table with explicit boolean vocabularies.
    pub fn new<T, F>(true_literals: T, false_literals: F) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            true_literals: true_literals
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            false_literals: false_literals
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Build from the boolean vocabulary in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.true_literals, &settings.false_literals)
    }

    /// Interpret `text` as a boolean literal, case-insensitively.
    pub fn parse_bool(&self, text: &str) -> Option<bool> {
        let lower = text.to_lowercase();
        if self.true_literals.iter().any(|t| *t == lower) {
            Some(true)
        } else if self.false_literals.iter().any(|f| *f == lower) {
            Some(false)
        } else {
            None
        }
    }

    /// Whether `text` belongs to either boolean vocabulary.
    pub fn is_bool_literal(&self, text: &str) -> bool {
        self.parse_bool(text).is_some()
    }

    /// Convert a token for parameter `name`.
    ///
    /// A missing token yields [`Value::Absent`]; deciding whether absence is
    /// an error belongs to the binder. A token that fails to parse yields
    /// absent for nullable kinds and a [`ConversionError`] otherwise.
    pub fn convert(
        &self,
        name: &str,
        kind: ScalarKind,
        nullable: bool,
        token: Option<&str>,
    ) -> Result<Value, ConversionError> {
        let Some(text) = token else {
            return Ok(Value::Absent);
        };

        match self.parse(kind, text) {
            Some(value) => Ok(value),
            None if nullable => Ok(Value::Absent),
            None => Err(ConversionError::new(name, kind, text)),
        }
    }

    fn parse(&self, kind: ScalarKind, text: &str) -> Option<Value> {
        let value = match kind {
            ScalarKind::String => Value::String(text.to_string()),
            ScalarKind::Bool => Value::Bool(self.parse_bool(text)?),
            ScalarKind::Int8 => Value::Int8(text.parse().ok()?),
            ScalarKind::Int16 => Value::Int16(text.parse().ok()?),
            ScalarKind::Int32 => Value::Int32(text.parse().ok()?),
            ScalarKind::Int64 => Value::Int64(text.parse().ok()?),
            ScalarKind::Float32 => Value::Float32(text.parse().ok()?),
            ScalarKind::Float64 => Value::Float64(text.parse().ok()?),
            ScalarKind::Decimal => Value::Decimal(text.parse().ok()?),
            ScalarKind::Char => {
                let mut chars = text.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Value::Char(c)
            }
            ScalarKind::Duration => Value::Duration(parse_duration(text)?),
            ScalarKind::Timestamp => {
                Value::Timestamp(NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?)
            }
        };
        Some(value)
    }
}

impl Default for TypeCoercion {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Parse `[-][d.]hh:mm:ss[.fraction]` into a time span.
///
/// Hours must be below 24, minutes and seconds below 60, and the fraction
/// may carry up to nine digits.
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = body.split(':');
    let (head, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((d, h)) => (digits::<u32>(d)?, h),
        None => (0, head),
    };
    let hours = digits::<u32>(hours).filter(|h| *h < 24)?;
    let minutes = digits::<u32>(minutes).filter(|m| *m < 60)?;

    let (seconds, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let seconds = digits::<u32>(seconds).filter(|s| *s < 60)?;
    let nanos = if fraction.is_empty() {
        0
    } else {
        if fraction.len() > 9 {
            return None;
        }
        digits::<u32>(&format!("{:0<9}", fraction))?
    };

    let span = TimeDelta::days(i64::from(days))
        + TimeDelta::hours(i64::from(hours))
        + TimeDelta::minutes(i64::from(minutes))
        + TimeDelta::seconds(i64::from(seconds))
        + TimeDelta::nanoseconds(i64::from(nanos));

    Some(if negative { -span } else { span })
}

/// Render a time span in the form [`parse_duration`] accepts.
pub fn format_duration(span: &TimeDelta) -> String {
    let negative = *span < TimeDelta::zero();
    let magnitude = if negative { -*span } else { *span };

    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos();
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, minutes, seconds) = (rest / 3600, (rest % 3600) / 60, rest % 60);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

fn digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
