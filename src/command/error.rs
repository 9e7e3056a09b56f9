//! Errors raised while building a command table.

use crate::coerce::ConversionError;
use thiserror::Error;

/// Structural problems found while building a [`CommandTable`](super::CommandTable).
///
/// Build errors are fatal: they are reported to the registering caller and
/// never retried.
///
/// # Example
///
/// ```
/// use cmdkit::command::BuildError;
///
/// let error = BuildError::empty_controller("Tools");
/// assert!(error.to_string().contains("Tools"));
/// ```
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two controllers share a reference name, ignoring case.
    #[error("duplicate controller '{reference}': declared by {first} and {second}")]
    DuplicateController {
        /// Colliding reference name.
        reference: String,
        /// Structural name of the first declaration.
        first: String,
        /// Structural name of the second declaration.
        second: String,
    },

    /// Two actions of one controller share a reference name, ignoring case.
    #[error("duplicate action '{reference}' in controller '{controller}'")]
    DuplicateAction {
        /// Controller reference name.
        controller: String,
        /// Colliding action reference name.
        reference: String,
    },

    /// A controller declares no actions.
    #[error("controller '{controller}' declares no actions")]
    EmptyController {
        /// Controller reference name.
        controller: String,
    },

    /// Scalar and object parameters are mixed, or several objects are declared.
    #[error("invalid parameters for '{controller} {action}': {reason}")]
    InvalidParameterShape {
        /// Controller reference name.
        controller: String,
        /// Action reference name.
        action: String,
        /// What is wrong.
        reason: String,
    },

    /// Multi-controller and primary-controller registration were combined.
    #[error("registration conflict: {0}")]
    RegistrationConflict(String),

    /// Two token-bound parameters or fields answer to the same switch.
    #[error("switch '{switch}' is declared twice in '{controller} {action}'")]
    DuplicateSwitch {
        /// Controller reference name.
        controller: String,
        /// Action reference name.
        action: String,
        /// Colliding switch.
        switch: String,
    },

    /// A declared default does not coerce to its parameter's kind.
    #[error("invalid default in '{controller} {action}': {source}")]
    InvalidDefault {
        /// Controller reference name.
        controller: String,
        /// Action reference name.
        action: String,
        /// Underlying conversion failure.
        #[source]
        source: ConversionError,
    },

    /// Nothing was registered.
    #[error("no controllers registered")]
    EmptyTable,

    /// A declaration collector could not produce its declarations.
    #[error("declaration collector failed: {0}")]
    Collector(String),
}

impl BuildError {
    /// Create a DuplicateController error.
    pub fn duplicate_controller(
        reference: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateController {
            reference: reference.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a DuplicateAction error.
    pub fn duplicate_action(controller: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::DuplicateAction {
            controller: controller.into(),
            reference: reference.into(),
        }
    }

    /// Create an EmptyController error.
    pub fn empty_controller(controller: impl Into<String>) -> Self {
        Self::EmptyController {
            controller: controller.into(),
        }
    }

    /// Create an InvalidParameterShape error.
    pub fn invalid_shape(
        controller: impl Into<String>,
        action: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameterShape {
            controller: controller.into(),
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a RegistrationConflict error.
    pub fn registration_conflict(message: impl Into<String>) -> Self {
        Self::RegistrationConflict(message.into())
    }

    /// Create a DuplicateSwitch error.
    pub fn duplicate_switch(
        controller: impl Into<String>,
        action: impl Into<String>,
        switch: impl Into<String>,
    ) -> Self {
        Self::DuplicateSwitch {
            controller: controller.into(),
            action: action.into(),
            switch: switch.into(),
        }
    }

    /// Create a Collector error.
    pub fn collector(message: impl Into<String>) -> Self {
        Self::Collector(message.into())
    }
}
