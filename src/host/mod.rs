//! Hosts that run commands against a built table.
//!
//! [`Dispatcher`] chains resolution, binding and a registered handler for one
//! token list. With the `shell` feature, [`Shell`] drives a dispatcher from an
//! interactive session.

mod dispatcher;
mod help;
#[cfg(feature = "shell")]
mod shell;

pub use dispatcher::{ActionHandler, Dispatcher, Invocation, Outcome};
pub use help::{action_usage, render_help};
#[cfg(feature = "shell")]
pub use shell::Shell;
