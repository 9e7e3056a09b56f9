//! Resolver, binder and shell configuration.

use serde::{Deserialize, Serialize};

/// What happens to tokens left over once every parameter is bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidualPolicy {
    /// Drop them, logging a warning.
    #[default]
    Ignore,
    /// Fail the invocation with `BindError::UnexpectedTokens`.
    Reject,
}

/// Configuration consumed by the resolver, the binder and the hosts.
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```
/// use cmdkit::settings::{ResidualPolicy, Settings};
///
/// let settings: Settings = serde_json::from_str(r#"{ "switch_prefix": "/" }"#).unwrap();
/// assert_eq!(settings.switch_prefix, "/");
/// assert_eq!(settings.residual_tokens, ResidualPolicy::Ignore);
/// assert!(!settings.require_controller_name);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fail resolution when no controller name heads the input.
    pub require_controller_name: bool,

    /// Fail resolution when no action name follows the controller.
    pub require_action_name: bool,

    /// Prepended to a parameter's declared name to form its switch,
    /// unless the parameter carries an alias.
    pub switch_prefix: String,

    /// Literals read as `true`, compared case-insensitively.
    pub true_literals: Vec<String>,

    /// Literals read as `false`, compared case-insensitively.
    pub false_literals: Vec<String>,

    /// Handling of unconsumed tokens after binding.
    pub residual_tokens: ResidualPolicy,

    /// Keyword that prints the command listing when no action claims it.
    pub help_command: Option<String>,

    /// Interactive shell behaviour.
    pub shell: ShellSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            require_controller_name: false,
            require_action_name: false,
            switch_prefix: "--".to_string(),
            true_literals: ["true", "yes", "y", "1"].map(String::from).to_vec(),
            false_literals: ["false", "no", "n", "0"].map(String::from).to_vec(),
            residual_tokens: ResidualPolicy::Ignore,
            help_command: Some("help".to_string()),
            shell: ShellSettings::default(),
        }
    }
}

impl Settings {
    /// Switch name for a declared parameter: the alias verbatim, or the
    /// switch prefix followed by the declared name.
    pub fn switch_name(&self, name: &str, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => alias.to_string(),
            None => format!("{}{}", self.switch_prefix, name),
        }
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Printed before each input line.
    pub prompt: String,

    /// Printed once when the shell starts.
    pub banner: Option<String>,

    /// Refuse to start a shell when no arguments were given.
    pub disabled: bool,

    /// Print the command listing after a failed line.
    pub show_help_on_invalid_command: bool,

    /// Lines that end the session, compared case-insensitively.
    pub exit_commands: Vec<String>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            prompt: " > ".to_string(),
            banner: None,
            disabled: false,
            show_help_on_invalid_command: true,
            exit_commands: vec!["exit".to_string(), "quit".to_string()],
        }
    }
}
