//! Errors raised while resolving a command.

use thiserror::Error;

/// Failures to pick a single action from the head of the input.
///
/// These are recoverable per input line in an interactive host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A controller name is required but none headed the input.
    #[error("a controller name is required")]
    MissingControllerName,

    /// An action name is required but none followed the controller.
    #[error("an action name is required")]
    MissingActionName,

    /// No registered action matched.
    #[error("unknown command '{input}'")]
    UnknownCommand {
        /// The input that failed to resolve, joined with spaces.
        input: String,
    },

    /// More than one registered action matched.
    #[error("ambiguous command '{input}', candidates: {}", candidates.join(", "))]
    AmbiguousCommand {
        /// The input that failed to resolve, joined with spaces.
        input: String,
        /// `controller action` pairs that matched.
        candidates: Vec<String>,
    },
}
