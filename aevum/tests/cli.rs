//! End-to-end tests that invoke the `aevum` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn aevum(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_aevum"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start aevum");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for aevum")
}

#[test]
fn piped_repl_keeps_lines_after_input() {
    let output = aevum(
        &[],
        "var a = input();\nfoo\nprint \"got \" + a;\nprint \"after\";\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("got foo\n"), "{}", stdout);
    assert!(stdout.contains("after\n"), "{}", stdout);
}

#[test]
fn piped_repl_reports_errors_and_continues() {
    let output = aevum(&[], "print nope;\nprint 1 +;\nprint \"still here\";\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("still here\n"), "{}", stdout);
    assert!(stderr.contains("[line 1] Runtime error: Undefined variable 'nope'."), "{}", stderr);
    assert!(stderr.contains("[line 1] Error at ';': Expect expression."), "{}", stderr);
}

#[test]
fn too_many_arguments_is_a_usage_error() {
    let output = aevum(&["one.av", "two.av"], "");
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: aevum [script]"));
}

#[test]
fn missing_script_is_an_io_error() {
    let output = aevum(&["/nonexistent/aevum/script.av"], "");
    assert_eq!(output.status.code(), Some(74));
}
