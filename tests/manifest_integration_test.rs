//! Tables built from TOML manifests and settings files on disk.

use cmdkit::command::{BuildError, CommandTableBuilder};
use cmdkit::config::{load_table, ManifestCollector, SettingsLoader};
use cmdkit::host::{Dispatcher, Outcome};
use cmdkit::settings::ResidualPolicy;
use cmdkit::CmdkitError;
use serde_json::json;
use std::fs;

const MANIFEST: &str = r#"
[[controllers]]
name = "InventoryController"

[[controllers.actions]]
name = "restock"

[[controllers.actions.parameters]]
name = "sku"
shape = "scalar"
kind = "string"

[[controllers.actions.parameters]]
name = "quantity"
shape = "scalar"
kind = "int32"
default = "1"

[[controllers.actions]]
name = "price"
alias = "set-price"

[[controllers.actions.parameters]]
name = "sku"
shape = "scalar"
kind = "string"

[[controllers.actions.parameters]]
name = "amount"
shape = "scalar"
kind = "decimal"
"#;

const SETTINGS: &str = r#"
[cmdkit]
switch_prefix = "/"
residual_tokens = "reject"
"#;

#[test]
fn test_load_table_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("commands.toml");
    let settings = dir.path().join("cmdkit.toml");
    fs::write(&manifest, MANIFEST).unwrap();
    fs::write(&settings, SETTINGS).unwrap();

    let table = load_table(&manifest, Some(&settings)).unwrap();
    assert_eq!(table.action_count(), 2);
    assert_eq!(table.settings().switch_prefix, "/");
    assert_eq!(table.settings().residual_tokens, ResidualPolicy::Reject);

    let dispatcher = Dispatcher::new(table)
        .on("Inventory", "restock", |_, args| Ok(args.to_json()))
        .on("Inventory", "set-price", |_, args| Ok(args.to_json()));

    assert_eq!(
        dispatcher.dispatch(&["inventory", "restock", "/sku", "A-1"]).unwrap(),
        Outcome::Completed(json!(["A-1", 1]))
    );
    assert_eq!(
        dispatcher.dispatch(&["set-price", "A-1", "/amount", "9.5"]).unwrap(),
        Outcome::Completed(json!(["A-1", "9.5"]))
    );
    assert!(matches!(
        dispatcher.dispatch(&["restock", "A-1", "2", "3"]),
        Err(CmdkitError::Bind(_))
    ));
}

#[test]
fn test_load_table_without_settings_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("commands.toml");
    fs::write(&manifest, MANIFEST).unwrap();

    let table = load_table(&manifest, Some(&dir.path().join("missing.toml"))).unwrap();
    assert_eq!(table.settings().switch_prefix, "--");
}

#[test]
fn test_missing_manifest_is_build_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_table(&dir.path().join("none.toml"), None);
    assert!(matches!(
        result,
        Err(CmdkitError::Build(BuildError::Collector(_)))
    ));
}

#[test]
fn test_broken_settings_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("commands.toml");
    let settings = dir.path().join("cmdkit.toml");
    fs::write(&manifest, MANIFEST).unwrap();
    fs::write(&settings, "[cmdkit]\nrequire_action_name = 3\n").unwrap();

    assert!(matches!(
        load_table(&manifest, Some(&settings)),
        Err(CmdkitError::Config(_))
    ));
}

#[test]
fn test_invalid_default_in_manifest() {
    let collector = ManifestCollector::from_toml_str(
        r#"
        [[controllers]]
        name = "Bad"
        [[controllers.actions]]
        name = "run"
        [[controllers.actions.parameters]]
        name = "count"
        shape = "scalar"
        kind = "int32"
        default = "lots"
        "#,
    );
    let mut builder = CommandTableBuilder::new();
    builder.collect_from(&collector).unwrap();
    assert!(matches!(builder.build(), Err(BuildError::InvalidDefault { .. })));
}

#[test]
fn test_settings_loader_reads_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("cmdkit.toml");
    let env_file = dir.path().join(".env");
    fs::write(&settings, "help_command = \"?\"\n").unwrap();
    fs::write(&env_file, "CMDKIT_SHELL_PROMPT=\"manifest> \"\n").unwrap();

    let loaded = SettingsLoader::new(Some(&settings))
        .with_env_file(&env_file)
        .load()
        .unwrap();
    assert_eq!(loaded.help_command.as_deref(), Some("?"));
    assert_eq!(loaded.shell.prompt, "manifest> ");
}
