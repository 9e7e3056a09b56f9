//! Plain-text command listing.

use crate::command::{CommandTable, ParameterDeclaration, RegisteredAction, RegistrationMode};
use crate::settings::Settings;

/// Render every controller and action of `table`, controllers sorted by name.
///
/// Each action line lists its switches; optional ones are bracketed.
///
/// # Example
///
/// ```
/// use cmdkit::coerce::ScalarKind;
/// use cmdkit::command::{
///     ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
/// };
/// use cmdkit::host::render_help;
///
/// let mut builder = CommandTableBuilder::new();
/// builder.add_controller(
///     ControllerDeclaration::new("UsersController").action(
///         ActionDeclaration::new("add")
///             .param(ParameterDeclaration::scalar("name", ScalarKind::String))
///             .param(ParameterDeclaration::scalar("admin", ScalarKind::Bool)),
///     ),
/// );
///
/// let help = render_help(&builder.build().unwrap());
/// assert_eq!(help, "Users\n  add --name <string> [--admin]\n");
/// ```
pub fn render_help(table: &CommandTable) -> String {
    let mut controllers: Vec<_> = table.controllers().iter().collect();
    controllers.sort_by(|a, b| a.name().cmp(b.name()));
    let primary = table.mode() == RegistrationMode::PrimaryController;

    let mut out = String::new();
    for (i, controller) in controllers.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let indent = if primary { "" } else { "  " };
        if !primary {
            out.push_str(controller.reference());
            out.push('\n');
        }
        for action in controller.actions() {
            out.push_str(indent);
            out.push_str(&action_usage(action, table.settings()));
            out.push('\n');
        }
    }
    out
}

/// One-line usage for an action: its reference followed by its switches.
pub fn action_usage(action: &RegisteredAction, settings: &Settings) -> String {
    let mut line = action.reference().to_string();
    for leaf in action.declaration().scalar_leaves() {
        line.push(' ');
        line.push_str(&switch_usage(leaf, settings));
    }
    line
}

fn switch_usage(leaf: &ParameterDeclaration, settings: &Settings) -> String {
    let switch = settings.switch_name(&leaf.name, leaf.alias.as_deref());
    let Some((kind, nullable)) = leaf.scalar_kind() else {
        return switch;
    };

    if kind.is_bool() && !nullable {
        return format!("[{}]", switch);
    }
    match &leaf.default {
        Some(default) => format!("[{} <{}>={}]", switch, kind, default),
        None if nullable => format!("[{} <{}>]", switch, kind),
        None => format!("{} <{}>", switch, kind),
    }
}
