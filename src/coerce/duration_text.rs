//! Serde helpers for `TimeDelta` fields in their `[-][d.]hh:mm:ss` text form.
//!
//! chrono gives `TimeDelta` no serde impls, so structs that receive a
//! duration parameter through [`ObjectValue::deserialize`](super::ObjectValue::deserialize)
//! name this module on the field:
//!
//! ```
//! use chrono::TimeDelta;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Job {
//!     #[serde(with = "cmdkit::coerce::duration_text")]
//!     timeout: TimeDelta,
//! }
//!
//! let job: Job = serde_json::from_str(r#"{"timeout":"00:01:30"}"#).unwrap();
//! assert_eq!(job.timeout, TimeDelta::seconds(90));
//! ```

use super::{format_duration, parse_duration};
use chrono::TimeDelta;
use serde::de::{self, Deserialize, Deserializer};
use serde::Serializer;

/// Write the span as text.
pub fn serialize<S: Serializer>(span: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_duration(span))
}

/// Read the span from text.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
    let text = String::deserialize(d)?;
    parse_duration(&text)
        .ok_or_else(|| de::Error::custom(format!("invalid duration '{text}'")))
}

/// The same for `Option<TimeDelta>`, with `null` as `None`.
pub mod option {
    use super::*;

    /// Write the span as text, or `null`.
    pub fn serialize<S: Serializer>(span: &Option<TimeDelta>, s: S) -> Result<S::Ok, S::Error> {
        match span {
            Some(span) => s.serialize_some(&format_duration(span)),
            None => s.serialize_none(),
        }
    }

    /// Read the span from text or `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeDelta>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| {
                parse_duration(&text)
                    .ok_or_else(|| de::Error::custom(format!("invalid duration '{text}'")))
            })
            .transpose()
    }
}
