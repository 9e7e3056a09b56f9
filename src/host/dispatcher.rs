//! Resolve, bind and invoke in one call.

use super::help::render_help;
use crate::bind::{BoundArguments, ParameterBinder, ServiceRegistry};
use crate::command::{fold_case, CommandTable};
use crate::error::{CmdkitError, CmdkitResult};
use crate::resolve::CommandResolver;
use crate::settings::Settings;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback invoked with the bound arguments of one action.
pub type ActionHandler =
    Arc<dyn Fn(&Invocation, BoundArguments) -> anyhow::Result<JsonValue> + Send + Sync>;

/// What a handler is told about the call it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    controller: String,
    action: String,
    input: Vec<String>,
}

impl Invocation {
    /// Controller reference name.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Action reference name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The complete token list as entered.
    pub fn input(&self) -> &[String] {
        &self.input
    }

    /// `controller action`, for messages.
    pub fn command(&self) -> String {
        format!("{} {}", self.controller, self.action)
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A handler ran and returned this value.
    Completed(JsonValue),
    /// The help keyword was entered; this is the listing.
    Help(String),
}

impl Outcome {
    /// Text to show a user, `None` when there is nothing to show.
    ///
    /// Strings are shown verbatim, `null` not at all, other values as pretty JSON.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Help(text) => Some(text.trim_end().to_string()),
            Self::Completed(JsonValue::Null) => None,
            Self::Completed(JsonValue::String(text)) => Some(text.clone()),
            Self::Completed(value) => {
                Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
            }
        }
    }
}

/// Routes token lists to handlers registered per controller/action.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::ScalarKind;
/// use cmdkit::command::{
///     ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
/// };
/// use cmdkit::host::{Dispatcher, Outcome};
/// use serde_json::json;
///
/// let mut builder = CommandTableBuilder::new();
/// builder.add_controller(
///     ControllerDeclaration::new("MathController").action(
///         ActionDeclaration::new("add")
///             .param(ParameterDeclaration::scalar("left", ScalarKind::Int64))
///             .param(ParameterDeclaration::scalar("right", ScalarKind::Int64)),
///     ),
/// );
///
/// let dispatcher = Dispatcher::new(builder.build().unwrap()).on("math", "add", |_, args| {
///     Ok(json!(args.get::<i64>(0)? + args.get::<i64>(1)?))
/// });
///
/// let outcome = dispatcher.dispatch(&["math", "add", "2", "--left", "40"]).unwrap();
/// assert_eq!(outcome, Outcome::Completed(json!(42)));
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<CommandTable>,
    services: ServiceRegistry,
    handlers: HashMap<(String, String), ActionHandler>,
}

impl Dispatcher {
    /// Create a dispatcher over a built table, with no handlers or services.
    pub fn new(table: impl Into<Arc<CommandTable>>) -> Self {
        Self {
            table: table.into(),
            services: ServiceRegistry::new(),
            handlers: HashMap::new(),
        }
    }

    /// Use `services` for service-shaped parameters.
    pub fn with_services(mut self, services: ServiceRegistry) -> Self {
        self.services = services;
        self
    }

    /// Services handed to the binder.
    pub fn services_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.services
    }

    /// Register the handler for `controller action`, by reference names.
    pub fn on<F>(mut self, controller: &str, action: &str, handler: F) -> Self
    where
        F: Fn(&Invocation, BoundArguments) -> anyhow::Result<JsonValue> + Send + Sync + 'static,
    {
        let known = self
            .table
            .controller(controller)
            .is_some_and(|c| c.action(action).is_some());
        if !known {
            warn!(controller, action, "handler registered for an action that is not in the table");
        }
        self.handlers
            .insert(handler_key(controller, action), Arc::new(handler));
        self
    }

    /// The command table.
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Settings the table was built with.
    pub fn settings(&self) -> &Settings {
        self.table.settings()
    }

    /// `controller action` for every table entry without a handler.
    pub fn missing_handlers(&self) -> Vec<String> {
        self.table
            .entries()
            .filter(|(c, a)| !self.handlers.contains_key(&handler_key(c.reference(), a.reference())))
            .map(|(c, a)| format!("{} {}", c.reference(), a.reference()))
            .collect()
    }

    /// The command listing.
    pub fn help(&self) -> String {
        render_help(&self.table)
    }

    /// Resolve, bind and invoke the handler for one token list.
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S]) -> CmdkitResult<Outcome> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        if self.is_help(&tokens) {
            return Ok(Outcome::Help(self.help()));
        }

        let binding = CommandResolver::new(&self.table).resolve(&tokens)?;
        let controller = binding.controller().reference();
        let action = binding.action().reference();
        let handler = self
            .handlers
            .get(&handler_key(controller, action))
            .ok_or_else(|| CmdkitError::handler_not_found(controller, action))?;

        let arguments = ParameterBinder::new(&self.table).bind(&binding, &self.services)?;
        let invocation = Invocation {
            controller: controller.to_string(),
            action: action.to_string(),
            input: tokens.iter().map(|t| t.to_string()).collect(),
        };

        debug!(command = %invocation.command(), "invoking handler");
        let output = handler(&invocation, arguments)
            .map_err(|e| CmdkitError::handler_failed(invocation.command(), e))?;
        Ok(Outcome::Completed(output))
    }

    /// Entry point for a process: dispatch `args` once, or start the
    /// interactive shell on stdin/stdout when there are none.
    ///
    /// Returns `None` after a shell session ends.
    pub fn run<I, S>(&self, args: I) -> CmdkitResult<Option<Outcome>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if !args.is_empty() {
            return self.dispatch(&args).map(Some);
        }
        self.start_shell().map(|()| None)
    }

    #[cfg(feature = "shell")]
    fn start_shell(&self) -> CmdkitResult<()> {
        let stdin = std::io::stdin();
        super::shell::Shell::new(self).run(stdin.lock(), std::io::stdout())
    }

    #[cfg(not(feature = "shell"))]
    fn start_shell(&self) -> CmdkitResult<()> {
        Err(CmdkitError::ShellDisabled)
    }

    /// The help keyword alone, when no controller or action answers to it.
    fn is_help(&self, tokens: &[&str]) -> bool {
        let Some(keyword) = self.settings().help_command.as_deref() else {
            return false;
        };
        let keyword = fold_case(keyword);
        let [token] = tokens else {
            return false;
        };
        fold_case(token) == keyword
            && !self.table.entries().any(|(c, a)| {
                fold_case(c.reference()) == keyword || fold_case(a.reference()) == keyword
            })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handlers: Vec<String> = self
            .handlers
            .keys()
            .map(|(c, a)| format!("{} {}", c, a))
            .collect();
        handlers.sort();
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("services", &self.services)
            .field("handlers", &handlers)
            .finish()
    }
}

fn handler_key(controller: &str, action: &str) -> (String, String) {
    (fold_case(controller), fold_case(action))
}
