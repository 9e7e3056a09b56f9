//! Errors raised while binding tokens to parameters.

use crate::coerce::ConversionError;
use crate::command::ServiceKey;
use thiserror::Error;

/// Failures to build an argument list for a resolved action.
#[derive(Debug, Error)]
pub enum BindError {
    /// A non-boolean switch was the last token, or was followed by another switch.
    #[error("switch '{switch}' expects a value")]
    MissingSwitchValue {
        /// The switch as declared.
        switch: String,
    },

    /// A non-nullable scalar received no token and has no default.
    #[error("missing required argument '{parameter}'")]
    MissingRequiredArgument {
        /// Parameter or field name.
        parameter: String,
    },

    /// A token did not parse as its non-nullable kind.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The service lookup had no instance for a service-shaped parameter.
    #[error("no service '{service}' available for parameter '{parameter}'")]
    UnresolvableParameter {
        /// Parameter name.
        parameter: String,
        /// Requested service.
        service: ServiceKey,
    },

    /// Tokens were left over and the residual policy rejects them.
    #[error("unexpected tokens: {}", .0.join(" "))]
    UnexpectedTokens(Vec<String>),

    /// A bound argument was read back as the wrong type.
    #[error("argument {index} is {found}, not {expected}")]
    ArgumentType {
        /// Position in the argument list.
        index: usize,
        /// Requested type.
        expected: String,
        /// What the slot holds.
        found: String,
    },
}

impl BindError {
    /// Create a MissingSwitchValue error.
    pub fn missing_switch_value(switch: impl Into<String>) -> Self {
        Self::MissingSwitchValue {
            switch: switch.into(),
        }
    }

    /// Create a MissingRequiredArgument error.
    pub fn missing_required(parameter: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            parameter: parameter.into(),
        }
    }

    /// Create an ArgumentType error.
    pub fn argument_type(
        index: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ArgumentType {
            index,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
