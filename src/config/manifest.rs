//! Controller declarations read from a TOML manifest.

use crate::command::{BuildError, BuildResult, ControllerDeclaration, DeclarationCollector};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed manifest document.
///
/// ```toml
/// [[controllers]]
/// name = "UsersController"
///
/// [[controllers.actions]]
/// name = "add"
///
/// [[controllers.actions.parameters]]
/// name = "name"
/// shape = "scalar"
/// kind = "string"
///
/// [[controllers.actions.parameters]]
/// name = "admin"
/// shape = "scalar"
/// kind = "bool"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared controllers, in order.
    #[serde(default)]
    pub controllers: Vec<ControllerDeclaration>,
}

impl Manifest {
    /// Parse manifest TOML.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid manifest")
    }
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Inline(String),
}

/// A [`DeclarationCollector`] backed by a manifest file or string.
///
/// # Example
///
/// ```
/// use cmdkit::command::{CommandTableBuilder, DeclarationCollector};
/// use cmdkit::config::ManifestCollector;
///
/// let collector = ManifestCollector::from_toml_str(r#"
///     [[controllers]]
///     name = "PingController"
///
///     [[controllers.actions]]
///     name = "ping"
/// "#);
///
/// let mut builder = CommandTableBuilder::new();
/// assert_eq!(builder.collect_from(&collector).unwrap(), 1);
/// assert!(builder.build().unwrap().controller("ping").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ManifestCollector {
    source: Source,
}

impl ManifestCollector {
    /// Read declarations from a file each time they are collected.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
        }
    }

    /// Read declarations from TOML text.
    pub fn from_toml_str(content: impl Into<String>) -> Self {
        Self {
            source: Source::Inline(content.into()),
        }
    }

    /// Load and parse the manifest.
    pub fn load(&self) -> Result<Manifest> {
        match &self.source {
            Source::File(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
                Manifest::parse(&content)
                    .with_context(|| format!("Failed to parse manifest: {}", path.display()))
            }
            Source::Inline(content) => Manifest::parse(content),
        }
    }
}

impl DeclarationCollector for ManifestCollector {
    fn collect(&self) -> BuildResult<Vec<ControllerDeclaration>> {
        let manifest = self
            .load()
            .map_err(|e| BuildError::collector(format!("{:#}", e)))?;
        debug!(controllers = manifest.controllers.len(), "collected manifest declarations");
        Ok(manifest.controllers)
    }
}
