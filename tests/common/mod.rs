use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use assert_cmd::Command;
use predicates::str::contains;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Writes `source` to a throwaway `.nex` file under the system temp
/// directory and returns its path. Each call gets a fresh name so tests
/// running in parallel do not trample each other.
fn write_script(name: &str, source: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let mut path = std::env::temp_dir();
    path.push(format!("nex_test_{name}_{}_{n}.nex", std::process::id()));
    fs::write(&path, source).expect("failed to write temp script");
    path
}

/// Runs `source` as a script through the compiled `nex` binary and
/// asserts its stdout equals `expected` and that it exits successfully.
pub fn run_ok(name: &str, source: &str, expected: &str) {
    let path = write_script(name, source);
    Command::cargo_bin("nex")
        .expect("nex binary should build")
        .arg(&path)
        .assert()
        .success()
        .stdout(expected.to_string());
    let _ = fs::remove_file(path);
}

/// Runs `source` and asserts it exits 70 (runtime error) with stderr
/// containing `expected_substring`.
pub fn run_runtime_error(name: &str, source: &str, expected_substring: &str) {
    let path = write_script(name, source);
    Command::cargo_bin("nex")
        .expect("nex binary should build")
        .arg(&path)
        .assert()
        .code(70)
        .stderr(contains(expected_substring.to_string()));
    let _ = fs::remove_file(path);
}

/// Runs `source` and asserts it exits 65 (lex/parse/resolve error) with
/// stderr containing `expected_substring`.
pub fn run_static_error(name: &str, source: &str, expected_substring: &str) {
    let path = write_script(name, source);
    Command::cargo_bin("nex")
        .expect("nex binary should build")
        .arg(&path)
        .assert()
        .code(65)
        .stderr(contains(expected_substring.to_string()));
    let _ = fs::remove_file(path);
}
