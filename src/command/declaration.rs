//! Controller, action and parameter declarations.
//!
//! These records are what a host's declaration mechanism (macros, generated
//! code, a manifest file or a hand-written table) hands to the
//! [`CommandTableBuilder`](super::CommandTableBuilder).

use crate::coerce::ScalarKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffixes stripped from a controller's structural name to derive its
/// reference name, longest first.
const CONTROLLER_SUFFIXES: [&str; 2] = ["CliController", "Controller"];

/// Identifies a service type the binder asks the host for.
///
/// # Example
///
/// ```
/// use cmdkit::command::ServiceKey;
///
/// struct Clock;
///
/// let key = ServiceKey::of::<Clock>();
/// assert!(key.as_str().ends_with("Clock"));
/// assert_eq!(key, ServiceKey::of::<Clock>());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Key for a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Key from an explicit name, for manifests and non-Rust identities.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a parameter or field receives its value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ParameterShape {
    /// A single primitive bound from one token.
    Scalar {
        /// Requested kind.
        kind: ScalarKind,
        /// Whether absence and parse failures bind [`Value::Absent`](crate::coerce::Value::Absent).
        #[serde(default)]
        nullable: bool,
    },
    /// A structured value bound field by field.
    Object(ObjectShape),
    /// Not token-bound; supplied by the host's service lookup.
    Service {
        /// Type the lookup is asked for.
        service: ServiceKey,
    },
}

/// Fields of an object-shaped parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    /// Name of the constructed type.
    pub type_name: String,

    /// Fields in binding order.
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

impl ObjectShape {
    /// Create a shape with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }
}

/// A parameter of an action, or a field of an object shape.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::ScalarKind;
/// use cmdkit::command::ParameterDeclaration;
///
/// let age = ParameterDeclaration::nullable("age", ScalarKind::Int32).with_alias("-age");
/// assert_eq!(age.alias.as_deref(), Some("-age"));
/// assert!(age.is_token_bound());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Declared name.
    pub name: String,

    /// Switch override, used verbatim instead of prefix + name.
    #[serde(default)]
    pub alias: Option<String>,

    /// Value shape.
    #[serde(flatten)]
    pub shape: ParameterShape,

    /// Raw token coerced when neither a switch nor a position supplies one.
    #[serde(default)]
    pub default: Option<String>,
}

/// Object fields are declared exactly like parameters.
pub type FieldDeclaration = ParameterDeclaration;

impl ParameterDeclaration {
    fn with_shape(name: impl Into<String>, shape: ParameterShape) -> Self {
        Self {
            name: name.into(),
            alias: None,
            shape,
            default: None,
        }
    }

    /// A required scalar.
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_shape(
            name,
            ParameterShape::Scalar {
                kind,
                nullable: false,
            },
        )
    }

    /// An optional scalar.
    pub fn nullable(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_shape(
            name,
            ParameterShape::Scalar {
                kind,
                nullable: true,
            },
        )
    }

    /// An object-shaped parameter.
    pub fn object(name: impl Into<String>, shape: ObjectShape) -> Self {
        Self::with_shape(name, ParameterShape::Object(shape))
    }

    /// A service-shaped parameter.
    pub fn service(name: impl Into<String>, service: ServiceKey) -> Self {
        Self::with_shape(name, ParameterShape::Service { service })
    }

    /// Override the switch name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the fallback token.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the value comes from tokens rather than the service lookup.
    pub fn is_token_bound(&self) -> bool {
        !matches!(self.shape, ParameterShape::Service { .. })
    }

    /// Whether this is object-shaped.
    pub fn is_object(&self) -> bool {
        matches!(self.shape, ParameterShape::Object(_))
    }

    /// Scalar kind and nullability, if scalar-shaped.
    pub fn scalar_kind(&self) -> Option<(ScalarKind, bool)> {
        match self.shape {
            ParameterShape::Scalar { kind, nullable } => Some((kind, nullable)),
            _ => None,
        }
    }
}

/// One invocable command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDeclaration {
    /// Structural name, e.g. a method identifier.
    pub name: String,

    /// Reference name override.
    #[serde(default)]
    pub alias: Option<String>,

    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
}

impl ActionDeclaration {
    /// Create an action without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            parameters: Vec::new(),
        }
    }

    /// Override the reference name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append a parameter.
    pub fn param(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Name users type: the alias, else the structural name.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Scalar parameters and object fields, depth first in declaration order.
    pub fn scalar_leaves(&self) -> Vec<&ParameterDeclaration> {
        let mut leaves = Vec::new();
        collect_leaves(&self.parameters, &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(parameters: &'a [ParameterDeclaration], out: &mut Vec<&'a ParameterDeclaration>) {
    for parameter in parameters {
        match &parameter.shape {
            ParameterShape::Scalar { .. } => out.push(parameter),
            ParameterShape::Object(shape) => collect_leaves(&shape.fields, out),
            ParameterShape::Service { .. } => {}
        }
    }
}

/// A named group of actions.
///
/// # Example
///
/// ```
/// use cmdkit::command::{ActionDeclaration, ControllerDeclaration};
///
/// let controller = ControllerDeclaration::new("BasicNoAliasController")
///     .action(ActionDeclaration::new("IndexTwo"));
/// assert_eq!(controller.reference_name(), "BasicNoAlias");
///
/// let aliased = controller.clone().with_alias("basic");
/// assert_eq!(aliased.reference_name(), "basic");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerDeclaration {
    /// Structural name, e.g. a type identifier.
    pub name: String,

    /// Reference name override.
    #[serde(default)]
    pub alias: Option<String>,

    /// Actions in declaration order.
    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,
}

impl ControllerDeclaration {
    /// Create a controller without actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            actions: Vec::new(),
        }
    }

    /// Override the reference name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append an action.
    pub fn action(mut self, action: ActionDeclaration) -> Self {
        self.actions.push(action);
        self
    }

    /// Name users type: the alias, else the structural name without a
    /// conventional controller suffix.
    pub fn reference_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        CONTROLLER_SUFFIXES
            .iter()
            .find_map(|suffix| self.name.strip_suffix(suffix))
            .filter(|stripped| !stripped.is_empty())
            .unwrap_or(&self.name)
            .to_string()
    }
}
