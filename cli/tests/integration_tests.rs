use std::process::{Command, Output};

fn demo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chainargs-demo"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run chainargs-demo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Built-in requests
// ---------------------------------------------------------------------------

#[test]
fn help_prints_usage() {
    let output = demo(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Usage: chainargs-demo [global options] <action>"));
    assert!(text.contains("--retries <int>"));
    assert!(text.contains("copy <arg1> <arg2>"));
    assert!(text.contains("echo <arg1>"));
}

#[test]
fn help_for_one_action() {
    let output = demo(&["sum", "--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Usage: chainargs-demo sum <arg1> <arg2> [options]"));
    assert!(text.contains("--scale <double>"));
    assert!(text.contains("can be chained"));
}

#[test]
fn version_prints_package_version() {
    let output = demo(&["--version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("chainargs-demo {}\n", env!("CARGO_PKG_VERSION"))
    );
}

// ---------------------------------------------------------------------------
// Running actions
// ---------------------------------------------------------------------------

#[test]
fn copy_runs_with_scoped_flag() {
    let output = demo(&["copy", "a.txt", "b.txt", "--force"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "copy a.txt -> b.txt (overwrite)\n");
}

#[test]
fn chain_with_delimiter_and_implicit_link() {
    let output = demo(&[
        "--label", "demo", "echo", "hi", "--upper", "+", "sum", "1", "2", "echo", "bye",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "[demo] HI\n3\n[demo] bye\n");
}

#[test]
fn scale_applies_to_one_invocation() {
    let output = demo(&["sum", "1", "2", "--scale=2.5", "+", "sum", "1", "1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "7.5\n2\n");
}

#[test]
fn failing_action_sets_exit_status() {
    let output = demo(&["sum", "one", "2", "+", "echo", "after"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "after\n");
    assert!(stderr(&output).contains("operands must be numbers"));
}

#[test]
fn describe_prints_json() {
    let output = demo(&["describe"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("describe output is JSON");
    assert_eq!(value["settings"]["app_name"], "chainargs-demo");
    assert_eq!(value["settings"]["delimiters"][0], "+");
    let actions = value["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 4);
    assert_eq!(actions[0]["name"], "copy");
    assert_eq!(actions[0]["chainable"], false);
}

#[test]
fn describe_prints_yaml() {
    let output = demo(&["describe", "--format", "yaml"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("app_name: chainargs-demo"));
}

// ---------------------------------------------------------------------------
// Rejected input
// ---------------------------------------------------------------------------

#[test]
fn unknown_flag_exits_with_usage() {
    let output = demo(&["echo", "hi", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("error: unknown flag `--bogus`"));
    assert!(err.contains("Usage: chainargs-demo"));
}

#[test]
fn rejected_flag_value_exits_with_usage() {
    let output = demo(&["--retries=-1", "copy", "a", "b"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("rejected for flag `--retries`"));
}

#[test]
fn non_chainable_action_in_chain_is_an_error() {
    let output = demo(&["copy", "a", "b", "+", "echo", "hi"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("action `copy` cannot be chained"));
}

#[test]
fn missing_action_is_an_error() {
    let output = demo(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: no action given"));
}
