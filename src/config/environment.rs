//! Environment variable overrides for [`Settings`].

use crate::coerce::TypeCoercion;
use crate::settings::{ResidualPolicy, Settings};
use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix of every recognised variable.
pub const ENV_PREFIX: &str = "CMDKIT_";

/// Loads an optional `.env` file and applies `CMDKIT_*` variables to settings.
///
/// | Variable | Setting |
/// |---|---|
/// | `CMDKIT_REQUIRE_CONTROLLER_NAME` | `require_controller_name` |
/// | `CMDKIT_REQUIRE_ACTION_NAME` | `require_action_name` |
/// | `CMDKIT_SWITCH_PREFIX` | `switch_prefix` |
/// | `CMDKIT_RESIDUAL_TOKENS` | `residual_tokens` (`ignore` or `reject`) |
/// | `CMDKIT_SHELL_PROMPT` | `shell.prompt` |
///
/// Boolean variables accept the configured true/false literals.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
}

impl EnvironmentLoader {
    /// Create a loader. A `.env` file is only read when a path is given.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file.filter(|p| p.exists()) {
            if let Err(e) = dotenv::from_path(path) {
                warn!(path = %path.display(), error = %e, "failed to load .env file");
            }
        }
        Self {
            env_file: env_file.map(Path::to_path_buf),
        }
    }

    /// The `.env` file this loader was given.
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Apply process environment overrides to `settings`.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        apply_overrides(settings, |name| env::var(name).ok())
    }
}

/// Apply overrides read through `lookup`, which maps a full variable name to its value.
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        let name = format!("{}{}", ENV_PREFIX, suffix);
        lookup(&name).map(|value| (name, value))
    };
    let coercion = TypeCoercion::from_settings(settings);
    let flag = |name: &str, value: &str| {
        coercion
            .parse_bool(value)
            .with_context(|| format!("{} is not a boolean: {:?}", name, value))
    };

    if let Some((name, value)) = var("REQUIRE_CONTROLLER_NAME") {
        settings.require_controller_name = flag(&name, &value)?;
    }
    if let Some((name, value)) = var("REQUIRE_ACTION_NAME") {
        settings.require_action_name = flag(&name, &value)?;
    }
    if let Some((_, value)) = var("SWITCH_PREFIX") {
        settings.switch_prefix = value;
    }
    if let Some((name, value)) = var("RESIDUAL_TOKENS") {
        settings.residual_tokens = match value.to_lowercase().as_str() {
            "ignore" => ResidualPolicy::Ignore,
            "reject" => ResidualPolicy::Reject,
            _ => bail!("{} must be 'ignore' or 'reject', got {:?}", name, value),
        };
    }
    if let Some((_, value)) = var("SHELL_PROMPT") {
        settings.shell.prompt = value;
    }

    debug!("applied environment overrides");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut settings = Settings::default();
        apply_overrides(
            &mut settings,
            lookup(&[
                ("CMDKIT_REQUIRE_CONTROLLER_NAME", "yes"),
                ("CMDKIT_REQUIRE_ACTION_NAME", "0"),
                ("CMDKIT_SWITCH_PREFIX", "/"),
                ("CMDKIT_RESIDUAL_TOKENS", "Reject"),
                ("CMDKIT_SHELL_PROMPT", "cmd> "),
            ]),
        )
        .unwrap();

        assert!(settings.require_controller_name);
        assert!(!settings.require_action_name);
        assert_eq!(settings.switch_prefix, "/");
        assert_eq!(settings.residual_tokens, ResidualPolicy::Reject);
        assert_eq!(settings.shell.prompt, "cmd> ");
    }

    #[test]
    fn test_no_overrides_keeps_settings() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_values() {
        let mut settings = Settings::default();
        let error = apply_overrides(&mut settings, lookup(&[("CMDKIT_REQUIRE_ACTION_NAME", "maybe")]))
            .unwrap_err();
        assert!(error.to_string().contains("CMDKIT_REQUIRE_ACTION_NAME"));

        assert!(apply_overrides(&mut settings, lookup(&[("CMDKIT_RESIDUAL_TOKENS", "keep")])).is_err());
    }

    #[test]
    fn test_env_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "CMDKIT_TEST_ENV_FILE_MARKER=loaded\n").unwrap();

        let loader = EnvironmentLoader::new(Some(&path));
        assert_eq!(loader.env_file(), Some(path.as_path()));
        assert_eq!(env::var("CMDKIT_TEST_ENV_FILE_MARKER").unwrap(), "loaded");
    }
}
