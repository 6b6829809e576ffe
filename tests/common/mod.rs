#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application home for one test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Builds a script-mode invocation of the shell rooted at `home`.
pub fn script_command(home: &Path, lines: &[&str]) -> Command {
    let mut input = lines.join("\n");
    input.push('\n');

    let mut cmd = Command::cargo_bin("budget_form").expect("binary built");
    cmd.env("BUDGET_FORM_CLI_SCRIPT", "1")
        .env("BUDGET_FORM_HOME", home)
        .env("RUST_LOG", "off")
        .write_stdin(input);
    cmd
}
