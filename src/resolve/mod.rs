//! Command resolution.
//!
//! The resolver consumes the controller and action names at the head of the
//! input and returns the single matching [`ActionBinding`] together with the
//! tokens it left unconsumed. References are compared case-insensitively and
//! tried longest first, so a short alias never swallows the head of a longer
//! one. A reference containing spaces matches the same number of leading
//! tokens.
//!
//! An omitted controller or action narrows nothing. Leftover tokens that
//! name neither are an unknown command, unless a named controller has a
//! single action, in which case they are that action's arguments.
//!
//! # Example
//!
//! ```
//! use cmdkit::command::{ActionDeclaration, CommandTableBuilder, ControllerDeclaration};
//! use cmdkit::resolve::CommandResolver;
//!
//! let mut builder = CommandTableBuilder::new();
//! builder.add_controller(
//!     ControllerDeclaration::new("UsersController")
//!         .action(ActionDeclaration::new("list"))
//!         .action(ActionDeclaration::new("ListAll").with_alias("list all")),
//! );
//! let table = builder.build().unwrap();
//!
//! let binding = CommandResolver::new(&table)
//!     .resolve(&["users", "LIST", "all", "--page", "2"])
//!     .unwrap();
//! assert_eq!(binding.action().reference(), "list all");
//! assert_eq!(binding.residual(), ["--page", "2"]);
//! ```

mod error;

pub use error::ResolveError;

use crate::command::{
    fold_case, CommandTable, RegisteredAction, RegisteredController, RegistrationMode,
};
use tracing::debug;

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// A resolved controller/action pair and the tokens left for the binder.
#[derive(Debug, Clone)]
pub struct ActionBinding<'t> {
    controller: &'t RegisteredController,
    action: &'t RegisteredAction,
    residual: Vec<String>,
}

impl<'t> ActionBinding<'t> {
    /// Build a binding directly, bypassing resolution.
    pub fn new(
        controller: &'t RegisteredController,
        action: &'t RegisteredAction,
        residual: Vec<String>,
    ) -> Self {
        Self {
            controller,
            action,
            residual,
        }
    }

    /// Resolved controller.
    pub fn controller(&self) -> &'t RegisteredController {
        self.controller
    }

    /// Resolved action.
    pub fn action(&self) -> &'t RegisteredAction {
        self.action
    }

    /// Tokens after the controller/action prefix.
    pub fn residual(&self) -> &[String] {
        &self.residual
    }

    /// Take the residual tokens.
    pub fn into_residual(self) -> Vec<String> {
        self.residual
    }
}

/// Picks one action out of a [`CommandTable`] for a token list.
#[derive(Debug, Clone, Copy)]
pub struct CommandResolver<'t> {
    table: &'t CommandTable,
}

impl<'t> CommandResolver<'t> {
    /// Resolve against `table`, using the settings it was built with.
    pub fn new(table: &'t CommandTable) -> Self {
        Self { table }
    }

    /// Resolve the head of `tokens` to a single action.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> ResolveResult<ActionBinding<'t>> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let settings = self.table.settings();
        let mut consumed = 0;

        let mut controller_named = false;
        let controllers: Vec<&'t RegisteredController> = match self.table.mode() {
            RegistrationMode::PrimaryController => self.table.controllers().iter().collect(),
            RegistrationMode::MultiController => {
                let named = self.table.controllers().iter().map(|c| (c.reference(), c));
                match longest_match(named, &tokens) {
                    Some((width, matched)) => {
                        consumed += width;
                        controller_named = true;
                        matched
                    }
                    None if settings.require_controller_name => {
                        return Err(ResolveError::MissingControllerName)
                    }
                    None => self.table.controllers().iter().collect(),
                }
            }
        };

        let entries = controllers
            .iter()
            .copied()
            .flat_map(|c| c.actions().iter().map(move |a| (a.reference(), (c, a))));
        let candidates = match longest_match(entries, &tokens[consumed..]) {
            Some((width, matched)) => {
                consumed += width;
                matched
            }
            None if settings.require_action_name => return Err(ResolveError::MissingActionName),
            None => {
                let implied: Vec<_> = controllers
                    .iter()
                    .copied()
                    .flat_map(|c| c.actions().iter().map(move |a| (c, a)))
                    .collect();
                // Unmatched tokens may only follow a named single-action controller.
                let arguments_only =
                    consumed == tokens.len() || (controller_named && implied.len() == 1);
                if !arguments_only {
                    return Err(ResolveError::UnknownCommand {
                        input: tokens.join(" "),
                    });
                }
                implied
            }
        };

        match candidates.as_slice() {
            [] => Err(ResolveError::UnknownCommand {
                input: tokens.join(" "),
            }),
            &[(controller, action)] => {
                let residual: Vec<String> =
                    tokens[consumed..].iter().map(|t| t.to_string()).collect();
                debug!(
                    controller = controller.reference(),
                    action = action.reference(),
                    residual = residual.len(),
                    "resolved command"
                );
                Ok(ActionBinding::new(controller, action, residual))
            }
            many => Err(ResolveError::AmbiguousCommand {
                input: tokens.join(" "),
                candidates: many
                    .iter()
                    .map(|(c, a)| format!("{} {}", c.reference(), a.reference()))
                    .collect(),
            }),
        }
    }
}

/// Find the longest reference heading `tokens` and every item sharing it.
///
/// Returns the number of tokens the reference spans.
fn longest_match<'a, T, I>(named: I, tokens: &[&str]) -> Option<(usize, Vec<T>)>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut named: Vec<(&str, T)> = named.into_iter().collect();
    named.sort_by_key(|(reference, _)| std::cmp::Reverse(reference.chars().count()));

    let (width, folded) = named.iter().find_map(|(reference, _)| {
        let words: Vec<&str> = reference.split_whitespace().collect();
        heads(&words, tokens).then(|| (words.len(), fold_case(reference)))
    })?;

    let matched = named
        .into_iter()
        .filter(|(reference, _)| fold_case(reference) == folded)
        .map(|(_, item)| item)
        .collect();
    Some((width, matched))
}

fn heads(words: &[&str], tokens: &[&str]) -> bool {
    !words.is_empty()
        && words.len() <= tokens.len()
        && words
            .iter()
            .zip(tokens)
            .all(|(word, token)| fold_case(word) == fold_case(token))
}
