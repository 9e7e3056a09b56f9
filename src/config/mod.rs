//! File and environment configuration.
//!
//! Settings come from a TOML file through [`SettingsLoader`], with `CMDKIT_*`
//! environment overrides applied by [`EnvironmentLoader`]. Controller
//! declarations can be kept in a TOML manifest read by [`ManifestCollector`].
//!
//! # Example
//!
//! ```no_run
//! use cmdkit::config::load_table;
//! use std::path::Path;
//!
//! let table = load_table(Path::new("commands.toml"), Some(Path::new("cmdkit.toml"))).unwrap();
//! println!("{} actions", table.action_count());
//! ```
//!
//! # Feature Gate
//!
//! This module is gated behind the `config` feature:
//!
//! ```toml
//! [dependencies]
//! cmdkit = { version = "0.1", features = ["config"] }
//! ```

mod environment;
mod loader;
mod manifest;

pub use environment::{apply_overrides, EnvironmentLoader, ENV_PREFIX};
pub use loader::{parse_settings, SettingsLoader, DEFAULT_SETTINGS_PATH};
pub use manifest::{Manifest, ManifestCollector};

use crate::command::{CommandTable, CommandTableBuilder};
use crate::error::{CmdkitError, CmdkitResult};
use std::path::Path;

/// Build a table from a manifest, with settings from `settings_path`
/// (defaults when `None`) and the process environment.
pub fn load_table(manifest_path: &Path, settings_path: Option<&Path>) -> CmdkitResult<CommandTable> {
    let settings = SettingsLoader::new(settings_path)
        .load()
        .map_err(|e| CmdkitError::config(format!("{:#}", e)))?;

    let mut builder = CommandTableBuilder::new().with_settings(settings);
    builder.collect_from(&ManifestCollector::from_path(manifest_path))?;
    Ok(builder.build()?)
}
