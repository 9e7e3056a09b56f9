//! Crate-level error type.

use crate::bind::BindError;
use crate::command::BuildError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Result type for host-level operations.
pub type CmdkitResult<T> = Result<T, CmdkitError>;

/// Any failure from building, resolving, binding or running a command.
#[derive(Debug, Error)]
pub enum CmdkitError {
    /// The command table could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The input did not name a single action.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The input did not fit the action's parameters.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// An action resolved but nothing handles it.
    #[error("no handler registered for '{controller} {action}'")]
    HandlerNotFound {
        /// Controller reference name.
        controller: String,
        /// Action reference name.
        action: String,
    },

    /// The action handler returned an error.
    #[error("'{command}' failed: {source}")]
    HandlerFailed {
        /// `controller action` that failed.
        command: String,
        /// Error returned by the handler.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// No arguments were given and the interactive shell is disabled.
    #[error("interactive shell has been disabled and no arguments were passed")]
    ShellDisabled,

    /// Settings or manifests could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmdkitError {
    /// Create a HandlerNotFound error.
    pub fn handler_not_found(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::HandlerNotFound {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Create a HandlerFailed error from a handler's `anyhow` error.
    pub fn handler_failed(command: impl Into<String>, error: anyhow::Error) -> Self {
        Self::HandlerFailed {
            command: command.into(),
            source: error.into(),
        }
    }

    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether an interactive host should report this and read the next line.
    ///
    /// Resolve, bind and handler failures concern a single input line. Build,
    /// configuration and I/O failures do not go away by retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Resolve(_)
                | Self::Bind(_)
                | Self::HandlerNotFound { .. }
                | Self::HandlerFailed { .. }
        )
    }
}
