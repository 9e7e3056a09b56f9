//! Interactive shell over any line-oriented reader and writer.

use super::Dispatcher;
use crate::command::fold_case;
use crate::error::{CmdkitError, CmdkitResult};
use colored::Colorize;
use std::io::{BufRead, Write};
use tracing::debug;

/// Read-dispatch-print loop driven by [`ShellSettings`](crate::settings::ShellSettings).
///
/// Each line is split with shell quoting rules, dispatched, and its result
/// printed. Failures that concern only that line are printed and the loop
/// continues; anything else ends the session with an error.
///
/// # Example
///
/// ```
/// use cmdkit::command::{ActionDeclaration, CommandTableBuilder, ControllerDeclaration};
/// use cmdkit::host::{Dispatcher, Shell};
/// use serde_json::json;
///
/// let mut builder = CommandTableBuilder::new();
/// builder.add_controller(ControllerDeclaration::new("Ping").action(ActionDeclaration::new("ping")));
/// let dispatcher = Dispatcher::new(builder.build().unwrap()).on("ping", "ping", |_, _| Ok(json!("pong")));
///
/// let mut output = Vec::new();
/// Shell::new(&dispatcher).run("ping\nexit\n".as_bytes(), &mut output).unwrap();
/// assert!(String::from_utf8(output).unwrap().contains("pong"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Shell<'d> {
    dispatcher: &'d Dispatcher,
}

impl<'d> Shell<'d> {
    /// Create a shell dispatching through `dispatcher`.
    pub fn new(dispatcher: &'d Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run until end of input or an exit command.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> CmdkitResult<()> {
        let settings = &self.dispatcher.settings().shell;

        if let Some(banner) = &settings.banner {
            writeln!(output, "{}", banner)?;
        }
        if settings.disabled {
            return Err(CmdkitError::ShellDisabled);
        }

        let exit_commands: Vec<String> = settings.exit_commands.iter().map(|c| fold_case(c)).collect();
        let mut line = String::new();
        loop {
            write!(output, "{}", settings.prompt)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if exit_commands.contains(&fold_case(trimmed)) {
                debug!("shell exit requested");
                break;
            }

            let Some(tokens) = shlex::split(trimmed) else {
                writeln!(output, "{}", "error: unbalanced quotes".red())?;
                continue;
            };
            match self.dispatcher.dispatch(&tokens) {
                Ok(outcome) => {
                    if let Some(text) = outcome.render() {
                        writeln!(output, "{}", text)?;
                    }
                }
                Err(error) if error.is_recoverable() => self.report(&error, &mut output)?,
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn report<W: Write>(&self, error: &CmdkitError, output: &mut W) -> CmdkitResult<()> {
        writeln!(output, "{}", format!("error: {}", error).red())?;

        let invalid_command = matches!(error, CmdkitError::Resolve(_) | CmdkitError::Bind(_));
        if invalid_command && self.dispatcher.settings().shell.show_help_on_invalid_command {
            writeln!(output)?;
            writeln!(output, "{}", self.dispatcher.help().trim_end())?;
        }
        Ok(())
    }
}
