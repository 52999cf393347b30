// tests/cli.rs
//! Integration tests for the rankfix binary.

use std::process::{Command, Output};

fn rankfix(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rankfix"))
        .args(args)
        .arg("--color=never")
        .env_remove("RANKFIX_LOG")
        .output()
        .expect("Failed to run rankfix")
}

#[test]
fn resolve_prints_ranked_meaning() {
    let output = rankfix(&["resolve", "x = 1", "--local", "x:int"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout.lines().count(), 1, "stdout: {}", stdout);
    assert!(stdout.contains("0.8561"), "stdout: {}", stdout);
    assert!(stdout.contains("x = 1;"), "stdout: {}", stdout);
}

#[test]
fn resolve_corrects_typos() {
    let output = rankfix(&["resolve", "Sytem.out.println(\"hi\")"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    let best = stdout.lines().next().unwrap_or_default();
    assert!(best.contains("System.out.println(\"hi\");"), "stdout: {}", stdout);
}

#[test]
fn unresolvable_fragment_fails() {
    let output = rankfix(&["resolve", "f(x)", "--local", "x:int"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("no meaning found"), "stderr: {}", stderr);
}

#[test]
fn lexer_errors_are_rendered() {
    let output = rankfix(&["resolve", "x = @"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("E0001"), "stderr: {}", stderr);
    assert!(stderr.contains("<fragment>"), "stderr: {}", stderr);
}

#[test]
fn malformed_binding_is_rejected() {
    let output = rankfix(&["resolve", "x = 1", "--local", "x"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("malformed binding"), "stderr: {}", stderr);
}

#[test]
fn unknown_local_type_is_rejected() {
    let output = rankfix(&["resolve", "x = 1", "--local", "x:Widget"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("E4002"), "stderr: {}", stderr);
}

#[test]
fn version_reports_package_version() {
    let output = rankfix(&["version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with(&format!("rankfix {}", env!("CARGO_PKG_VERSION"))));
}
