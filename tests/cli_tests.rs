//! Integration smoke tests for the `bootnotify` CLI surface.
//!
//! Only argument parsing and help output are exercised here; anything that
//! would probe the network or shell out to systemctl is covered by the
//! mocked pipeline tests inside the library.

use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bootnotify"))
        .args(args)
        .output()
        .expect("binary should spawn")
}

#[test]
fn help_lists_every_flag() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: bootnotify"));
    for flag in [
        "--console",
        "--verbose",
        "--install",
        "--uninstall",
        "--start",
        "--stop",
        "--configure",
    ] {
        assert!(stdout.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn version_flag_prints_the_version() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn conflicting_mode_flags_fail_argument_parsing() {
    let output = run_cli(&["--install", "--uninstall"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "stderr: {stderr}");
}

#[test]
fn host_list_flags_are_rejected() {
    for flag in ["--add", "--remove"] {
        let output = run_cli(&[flag, "pi5"]);
        assert!(!output.status.success(), "{flag} must not be accepted");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unexpected argument"), "stderr: {stderr}");
    }
}
