//! Integration tests that run the CLI binary.

use std::path::Path;
use std::process::{Command, Output};

fn bin(home: &Path) -> Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_meee", "-", "chat"));
    let mut cmd = Command::new(bin);
    // Run from a temp dir with a temp home so no .env is picked up.
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env_remove("MEEE_API_KEY")
        .env_remove("MEEE_API_URL")
        .env_remove("MEEE_MODEL")
        .env_remove("MEEE_MODELS")
        .env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    bin(tmp.path())
        .args(args)
        .output()
        .expect("binary not found - run cargo build first")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = run(&["--help"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("serve"), "expected subcommands in usage: {}", out);
    assert!(out.contains("--prompt"));
}

#[test]
fn cli_version_succeeds() {
    let output = run(&["--version"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("meee-chat"));
}

#[test]
fn serve_without_api_key_exits_with_error() {
    let output = run(&["serve", "--port", "0"]);
    assert!(
        !output.status.success(),
        "expected failure when MEEE_API_KEY is not set"
    );
    let err = stderr(&output);
    assert!(
        err.contains("MEEE_API_KEY"),
        "expected API key error message, got: {}",
        err
    );
}

#[test]
fn models_lists_builtin_catalog() {
    let output = run(&["models"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("a4"), "expected default model in list: {}", out);
    assert!(out.contains("active"));
}

#[test]
fn models_query_without_match_still_succeeds() {
    let output = run(&["models", "--query", "no-such-model-xyz"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!stdout(&output).contains("a4"));
}

#[test]
fn empty_prompt_is_rejected() {
    let output = run(&["-p", "   "]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("empty prompt"));
}

#[test]
fn prompt_with_unreachable_relay_prints_fallback_and_fails() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .env("MEEE_API_URL", "http://127.0.0.1:1/api/chat")
        .args(["-p", "hello"])
        .output()
        .expect("binary not found - run cargo build first");
    assert!(!output.status.success());
    assert!(
        stdout(&output).to_lowercase().contains("sorry"),
        "expected fallback reply on stdout: {}",
        stdout(&output)
    );
}

#[test]
fn completions_generate_script() {
    let output = run(&["completions", "bash"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("meee-chat"));
}
