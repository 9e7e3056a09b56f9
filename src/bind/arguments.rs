//! Bound argument list handed to the invoker.

use super::{BindError, BindResult, ServiceInstance};
use crate::coerce::{FromValue, ObjectValue, Value};
use serde_json::Value as JsonValue;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One bound parameter.
#[derive(Clone)]
pub enum Argument {
    /// A scalar or object bound from tokens.
    Value(Value),
    /// An instance supplied by the service lookup.
    Service(ServiceInstance),
}

impl Argument {
    /// The bound value, `None` for services.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Service(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Value(value) => value.type_name(),
            Self::Service(_) => "a service".to_string(),
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Service(_) => f.write_str("Service(..)"),
        }
    }
}

/// Ordered arguments matching an action's declared parameters.
///
/// # Example
///
/// ```
/// use cmdkit::bind::{Argument, BoundArguments};
/// use cmdkit::coerce::Value;
///
/// let args = BoundArguments::new(vec![
///     Argument::Value(Value::String("Jake".into())),
///     Argument::Value(Value::Int32(21)),
///     Argument::Value(Value::Absent),
/// ]);
///
/// assert_eq!(args.get::<String>(0).unwrap(), "Jake");
/// assert_eq!(args.get::<i64>(1).unwrap(), 21);
/// assert_eq!(args.get::<Option<bool>>(2).unwrap(), None);
/// assert!(args.get::<bool>(1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
    arguments: Vec<Argument>,
}

impl BoundArguments {
    /// Wrap an argument list.
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self { arguments }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Whether the action takes no arguments.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Argument at `index`.
    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    /// Bound value at `index`, `None` for services and out-of-range indices.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.argument(index).and_then(Argument::as_value)
    }

    /// Typed value at `index`.
    pub fn get<T: FromValue>(&self, index: usize) -> BindResult<T> {
        let argument = self.require(index, std::any::type_name::<T>())?;
        argument
            .as_value()
            .and_then(T::from_value)
            .ok_or_else(|| {
                BindError::argument_type(index, std::any::type_name::<T>(), argument.describe())
            })
    }

    /// Object value at `index`.
    pub fn object(&self, index: usize) -> BindResult<&ObjectValue> {
        let argument = self.require(index, "an object")?;
        argument
            .as_value()
            .and_then(Value::as_object)
            .ok_or_else(|| BindError::argument_type(index, "an object", argument.describe()))
    }

    /// Service instance at `index`, downcast to `T`.
    pub fn service<T: Any + Send + Sync>(&self, index: usize) -> BindResult<Arc<T>> {
        let expected = std::any::type_name::<T>();
        match self.require(index, expected)? {
            Argument::Service(instance) => instance
                .clone()
                .downcast::<T>()
                .map_err(|_| BindError::argument_type(index, expected, "a different service")),
            other => Err(BindError::argument_type(index, expected, other.describe())),
        }
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    /// Take the argument list.
    pub fn into_vec(self) -> Vec<Argument> {
        self.arguments
    }

    /// Render the bound values as a JSON array; services become `null`.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.arguments
                .iter()
                .map(|argument| argument.as_value().map_or(JsonValue::Null, Value::to_json))
                .collect(),
        )
    }

    fn require(&self, index: usize, expected: &str) -> BindResult<&Argument> {
        self.argument(index)
            .ok_or_else(|| BindError::argument_type(index, expected, "missing"))
    }
}

impl<'a> IntoIterator for &'a BoundArguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Clock;

    fn sample() -> BoundArguments {
        let mut person = ObjectValue::new("Person");
        person.set("name", Value::String("Jake".into()));
        BoundArguments::new(vec![
            Argument::Service(Arc::new(Clock)),
            Argument::Value(Value::Object(person)),
            Argument::Value(Value::Bool(true)),
        ])
    }

    #[test]
    fn test_typed_access() {
        let args = sample();
        assert_eq!(args.len(), 3);
        assert!(args.get::<bool>(2).unwrap());
        assert_eq!(args.object(1).unwrap().get("name"), Some(&Value::String("Jake".into())));
        assert!(args.service::<Clock>(0).is_ok());
    }

    #[test]
    fn test_type_mismatch() {
        let args = sample();
        match args.get::<i32>(2) {
            Err(BindError::ArgumentType { index, found, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(found, "bool");
            }
            other => panic!("Expected ArgumentType, got {:?}", other),
        }
        assert!(args.service::<String>(0).is_err());
        assert!(args.object(0).is_err());
        assert!(args.get::<bool>(9).is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(sample().to_json(), json!([null, { "name": "Jake" }, true]));
    }

    #[test]
    fn test_debug_hides_services() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("Service(..)"));
    }
}
