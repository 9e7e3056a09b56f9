//! TOML settings loading.

use super::environment::EnvironmentLoader;
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "cmdkit.toml";

/// Table holding the settings when they share a file with other configuration.
const SETTINGS_TABLE: &str = "cmdkit";

/// Loads [`Settings`] from a TOML file, then applies environment overrides.
///
/// The file may hold the settings at top level or under a `[cmdkit]` table.
/// A missing file yields the defaults.
///
/// # Example
///
/// ```no_run
/// use cmdkit::config::SettingsLoader;
/// use std::path::Path;
///
/// let loader = SettingsLoader::new(Some(Path::new("config/cli.toml")))
///     .with_env_file(Path::new(".env"));
/// let settings = loader.load().unwrap();
/// println!("switch prefix: {}", settings.switch_prefix);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    path: PathBuf,
    env_file: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a loader for `path`, or [`DEFAULT_SETTINGS_PATH`] when `None`.
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
            env_file: None,
        }
    }

    /// Read a `.env` file before applying environment overrides.
    pub fn with_env_file(mut self, env_file: &Path) -> Self {
        self.env_file = Some(env_file.to_path_buf());
        self
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file (or defaults) and apply `CMDKIT_*` overrides.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = self.load_file()?;
        EnvironmentLoader::new(self.env_file.as_deref()).apply(&mut settings)?;
        Ok(settings)
    }

    /// Load the file alone, without environment overrides.
    pub fn load_file(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "settings file not found, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;
        parse_settings(&content)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Parse settings from TOML text, preferring a `[cmdkit]` table when present.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let document: toml::Table = toml::from_str(content).context("Invalid TOML")?;
    let settings = match document.get(SETTINGS_TABLE) {
        Some(table) => table.clone().try_into(),
        None => toml::Value::Table(document).try_into(),
    };
    settings.context("Invalid settings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ResidualPolicy;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SettingsLoader::new(Some(&dir.path().join("absent.toml")));
        assert_eq!(loader.load_file().unwrap(), Settings::default());
    }

    #[test]
    fn test_bare_document() {
        let settings = parse_settings(
            r#"
            switch_prefix = "-"
            residual_tokens = "reject"

            [shell]
            banner = "hello"
            "#,
        )
        .unwrap();
        assert_eq!(settings.switch_prefix, "-");
        assert_eq!(settings.residual_tokens, ResidualPolicy::Reject);
        assert_eq!(settings.shell.banner.as_deref(), Some("hello"));
        assert_eq!(settings.shell.prompt, " > ");
    }

    #[test]
    fn test_cmdkit_table() {
        let settings = parse_settings(
            r#"
            [app]
            name = "demo"

            [cmdkit]
            require_controller_name = true
            true_literals = ["on"]

            [cmdkit.shell]
            exit_commands = ["bye"]
            "#,
        )
        .unwrap();
        assert!(settings.require_controller_name);
        assert_eq!(settings.true_literals, vec!["on"]);
        assert_eq!(settings.shell.exit_commands, vec!["bye"]);
    }

    #[test]
    fn test_load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.toml");
        fs::write(&path, "help_command = \"?\"\n").unwrap();

        let settings = SettingsLoader::new(Some(&path)).load_file().unwrap();
        assert_eq!(settings.help_command.as_deref(), Some("?"));
    }

    #[test]
    fn test_parse_error_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "switch_prefix = [").unwrap();

        let error = SettingsLoader::new(Some(&path)).load_file().unwrap_err();
        assert!(error.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(parse_settings("require_action_name = \"sometimes\"").is_err());
    }
}
