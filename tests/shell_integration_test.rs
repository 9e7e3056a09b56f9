//! Interactive shell sessions driven through in-memory readers and writers.

use cmdkit::coerce::ScalarKind;
use cmdkit::command::{
    ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
};
use cmdkit::host::{Dispatcher, Shell};
use cmdkit::settings::Settings;
use serde_json::json;

fn dispatcher(settings: Settings) -> Dispatcher {
    let mut builder = CommandTableBuilder::new().with_settings(settings);
    builder.primary_controller(
        ControllerDeclaration::new("CounterController")
            .action(
                ActionDeclaration::new("add")
                    .param(ParameterDeclaration::scalar("left", ScalarKind::Int64))
                    .param(ParameterDeclaration::scalar("right", ScalarKind::Int64)),
            )
            .action(
                ActionDeclaration::new("greet")
                    .param(ParameterDeclaration::scalar("name", ScalarKind::String))
                    .param(ParameterDeclaration::scalar("loud", ScalarKind::Bool)),
            )
            .action(ActionDeclaration::new("fail"))
            .action(ActionDeclaration::new("quiet")),
    );

    Dispatcher::new(builder.build().unwrap())
        .on("Counter", "add", |_, args| {
            Ok(json!(args.get::<i64>(0)? + args.get::<i64>(1)?))
        })
        .on("Counter", "greet", |_, args| {
            let name: String = args.get(0)?;
            let greeting = format!("hello {}", name);
            Ok(json!(if args.get::<bool>(1)? { greeting.to_uppercase() } else { greeting }))
        })
        .on("Counter", "fail", |_, _| anyhow::bail!("boom"))
        .on("Counter", "quiet", |_, _| Ok(serde_json::Value::Null))
}

fn session(settings: Settings, input: &str) -> String {
    let dispatcher = dispatcher(settings);
    let mut output = Vec::new();
    Shell::new(&dispatcher).run(input.as_bytes(), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_session_runs_each_line() {
    let output = session(
        Settings::default(),
        "add 2 40\ngreet 'Jake Smith' --loud\ngreet --name Ann\n",
    );
    assert!(output.contains("42\n"));
    assert!(output.contains("HELLO JAKE SMITH\n"));
    assert!(output.contains("hello Ann\n"));
}

#[test]
fn test_blank_lines_and_null_results_print_nothing() {
    let mut settings = Settings::default();
    settings.shell.prompt = "> ".into();
    let output = session(settings, "\n   \nquiet\n");
    assert_eq!(output, "> > > > \n");
}

#[test]
fn test_unknown_command_shows_help_and_continues() {
    let output = session(Settings::default(), "subtract 1 2\nadd 1 2\n");
    assert!(output.contains("unknown command 'subtract 1 2'"));
    assert!(output.contains("add --left <int64> --right <int64>"));
    assert!(output.contains("3\n"));
}

#[test]
fn test_handler_failure_does_not_show_help() {
    let output = session(Settings::default(), "fail\n");
    assert!(output.contains("boom"));
    assert!(!output.contains("--left <int64>"));
}

#[test]
fn test_help_keyword() {
    let output = session(Settings::default(), "help\n");
    assert!(output.contains("greet --name <string> [--loud]"));
    assert!(output.contains("quiet"));
}

#[test]
fn test_exit_commands_are_configurable() {
    let mut settings = Settings::default();
    settings.shell.exit_commands = vec!["bye".into()];
    let output = session(settings, "add 1 1\nBye\nadd 5 5\n");
    assert!(output.contains("2\n"));
    assert!(!output.contains("10\n"));
}
