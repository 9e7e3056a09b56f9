//! Scalar kinds a parameter or field can be coerced into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive type requested by a scalar-shaped parameter.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::ScalarKind;
///
/// assert_eq!(ScalarKind::Int32.to_string(), "int32");
/// assert!(ScalarKind::Bool.is_bool());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Presence flag or boolean literal.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Fixed-point decimal.
    Decimal,
    /// Verbatim text.
    String,
    /// A single character.
    Char,
    /// Time span in `[-][d.]hh:mm:ss[.fraction]` form.
    Duration,
    /// ISO 8601 date-time, `YYYY-MM-DDTHH:MM:SS[.fraction]`.
    Timestamp,
}

impl ScalarKind {
    /// Whether switches of this kind are presence flags.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Char => "char",
            Self::Duration => "duration",
            Self::Timestamp => "timestamp",
        };
        write!(f, "{}", name)
    }
}
