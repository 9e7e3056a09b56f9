//! Typed values produced by coercion and binding.

use super::convert::format_duration;
use super::{Decimal, ScalarKind};
use chrono::{NaiveDateTime, TimeDelta};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value as JsonValue};

/// Canonical timestamp layout, shared by parsing and rendering.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A coerced parameter or field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Nullable parameter with no usable token.
    Absent,
    /// Boolean.
    Bool(bool),
    /// 8-bit integer.
    Int8(i8),
    /// 16-bit integer.
    Int16(i16),
    /// 32-bit integer.
    Int32(i32),
    /// 64-bit integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Fixed-point decimal.
    Decimal(Decimal),
    /// Text.
    String(String),
    /// Single character.
    Char(char),
    /// Time span.
    Duration(TimeDelta),
    /// Date-time without offset.
    Timestamp(NaiveDateTime),
    /// Object-shaped parameter built field by field.
    Object(ObjectValue),
}

impl Value {
    /// Whether this is the absent value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Scalar kind of this value, `None` for absent and object values.
    pub fn kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Self::Absent | Self::Object(_) => return None,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int8(_) => ScalarKind::Int8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Decimal(_) => ScalarKind::Decimal,
            Self::String(_) => ScalarKind::String,
            Self::Char(_) => ScalarKind::Char,
            Self::Duration(_) => ScalarKind::Duration,
            Self::Timestamp(_) => ScalarKind::Timestamp,
        };
        Some(kind)
    }

    /// Short description used in type mismatch errors.
    pub fn type_name(&self) -> String {
        match self {
            Self::Absent => "absent".to_string(),
            Self::Object(object) => object.type_name().to_string(),
            other => other.kind().map(|k| k.to_string()).unwrap_or_default(),
        }
    }

    /// Borrow as text when this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as an object when this is an object value.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Render as JSON. Decimals, durations and timestamps become their
    /// canonical text, which [`Decimal`], [`duration_text`](super::duration_text)
    /// and chrono's `NaiveDateTime` read back.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Absent => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int8(n) => JsonValue::from(*n),
            Self::Int16(n) => JsonValue::from(*n),
            Self::Int32(n) => JsonValue::from(*n),
            Self::Int64(n) => JsonValue::from(*n),
            Self::Float32(n) => float_to_json(f64::from(*n)),
            Self::Float64(n) => float_to_json(*n),
            Self::Decimal(d) => JsonValue::String(d.to_string()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Char(c) => JsonValue::String(c.to_string()),
            Self::Duration(d) => JsonValue::String(format_duration(d)),
            Self::Timestamp(t) => JsonValue::String(t.format(TIMESTAMP_FORMAT).to_string()),
            Self::Object(object) => object.to_json(),
        }
    }
}

fn float_to_json(n: f64) -> JsonValue {
    Number::from_f64(n)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// An instance of an object shape, holding one value per declared field
/// in declaration order.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::{ObjectValue, Value};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: Option<i32>,
/// }
///
/// let mut object = ObjectValue::new("Person");
/// object.set("name", Value::String("Jake".into()));
/// object.set("age", Value::Int32(21));
///
/// let person: Person = object.deserialize().unwrap();
/// assert_eq!(person, Person { name: "Jake".into(), age: Some(21) });
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl ObjectValue {
    /// Create an empty instance of the named shape.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Name of the declared shape.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Set a field, replacing an earlier value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field by its declared name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a JSON object keyed by declared field names.
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        JsonValue::Object(map)
    }

    /// Construct a caller type from the bound fields through serde.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

/// Conversion from a bound [`Value`] into a concrete Rust type.
///
/// `Option<T>` maps [`Value::Absent`] to `None`; integer and float targets
/// accept narrower values of the same family.
pub trait FromValue: Sized {
    /// Convert, or `None` on a type mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value_exact {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_exact! {
    bool => Bool,
    i8 => Int8,
    f32 => Float32,
    String => String,
    char => Char,
    Decimal => Decimal,
    TimeDelta => Duration,
    NaiveDateTime => Timestamp,
    ObjectValue => Object,
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int8(v) => Some(i16::from(*v)),
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int8(v) => Some(i32::from(*v)),
            Value::Int16(v) => Some(i32::from(*v)),
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Absent => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
