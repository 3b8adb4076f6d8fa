// e2e/cli_integration.rs: CLI integration tests.
//
// Drives the `infback` binary as a black box with std::process::Command:
// file naming, stdin/stdout plumbing, test mode, the overwrite policy, window
// size selection and exit codes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use tempfile::TempDir;

/// Locate the `infback` binary produced by Cargo.
fn infback_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_infback") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("infback");
    p
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn content() -> Vec<u8> {
    "Hello, inflate!\n".repeat(400).into_bytes()
}

/// TempDir holding `input.txt.deflate`.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.txt.deflate");
    fs::write(&path, deflate(&content())).unwrap();
    (dir, path)
}

fn infback(dir: &Path) -> Command {
    let mut cmd = Command::new(infback_bin());
    cmd.current_dir(dir)
        .env_remove("INFBACK_WINDOW_BITS")
        .env_remove("INFBACK_NBWORKERS");
    cmd
}

// ── 1. File to derived name ──────────────────────────────────────────────────

#[test]
fn test_cli_decompress_to_derived_name() {
    let (dir, input) = make_temp_input();
    let status = infback(dir.path()).arg(&input).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(dir.path().join("input.txt")).unwrap(), content());
    assert!(input.exists(), "input is kept");
}

// ── 2. Explicit output ───────────────────────────────────────────────────────

#[test]
fn test_cli_explicit_output() {
    let (dir, input) = make_temp_input();
    let out = dir.path().join("elsewhere.bin");
    let status = infback(dir.path()).arg("-o").arg(&out).arg(&input).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&out).unwrap(), content());
}

// ── 3. stdin → stdout ────────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    let mut child = infback(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    let compressed = deflate(&content());
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(&compressed).unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, content());
}

#[test]
fn test_cli_stdout_flag_concatenates() {
    let (dir, input) = make_temp_input();
    let second = dir.path().join("second.deflate");
    fs::write(&second, deflate(b"tail\n")).unwrap();
    let output = infback(dir.path()).arg("-c").arg(&input).arg(&second).output().unwrap();
    assert!(output.status.success());
    let mut expected = content();
    expected.extend_from_slice(b"tail\n");
    assert_eq!(output.stdout, expected);
    assert!(!dir.path().join("input.txt").exists());
}

// ── 4. Test mode ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_test_mode_valid_and_corrupt() {
    let (dir, input) = make_temp_input();
    let status = infback(dir.path()).arg("-t").arg(&input).status().unwrap();
    assert!(status.success());
    assert!(!dir.path().join("input.txt").exists());

    let bad = dir.path().join("bad.deflate");
    fs::write(&bad, [0xFFu8, 0x00]).unwrap();
    let output = infback(dir.path()).arg("-t").arg(&bad).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid block type"));
}

// ── 5. Overwrite policy ──────────────────────────────────────────────────────

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let existing = dir.path().join("input.txt");
    fs::write(&existing, b"keep me").unwrap();

    let status = infback(dir.path()).arg(&input).status().unwrap();
    assert_eq!(status.code(), Some(1));
    assert_eq!(fs::read(&existing).unwrap(), b"keep me");

    let status = infback(dir.path()).arg("-f").arg(&input).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&existing).unwrap(), content());
}

// ── 6. Truncated input ───────────────────────────────────────────────────────

#[test]
fn test_cli_truncated_input_fails_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let mut compressed = deflate(&content());
    compressed.pop();
    let input = dir.path().join("cut.deflate");
    fs::write(&input, compressed).unwrap();

    let status = infback(dir.path()).arg("-q").arg(&input).status().unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(!dir.path().join("cut").exists());
}

// ── 7. Window size ───────────────────────────────────────────────────────────

#[test]
fn test_cli_window_bits_flag_and_environment() {
    let (dir, input) = make_temp_input();

    // Short-range repeats decode with the smallest window.
    let status = infback(dir.path()).args(["-t", "-w", "8"]).arg(&input).status().unwrap();
    assert!(status.success());

    // The tail repeats the head from thousands of bytes back.
    let mut far_data = content();
    far_data.extend((0..4000u32).map(|i| (i * 7 % 251) as u8));
    far_data.extend_from_slice(&content()[..1000]);
    let far = dir.path().join("far.deflate");
    fs::write(&far, deflate(&far_data)).unwrap();

    let status = infback(dir.path()).args(["-t", "-w", "8"]).arg(&far).status().unwrap();
    assert_eq!(status.code(), Some(1));
    let status = infback(dir.path())
        .env("INFBACK_WINDOW_BITS", "8")
        .arg("-t")
        .arg(&far)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
    let status = infback(dir.path()).arg("-t").arg(&far).status().unwrap();
    assert!(status.success());
}

#[test]
fn test_cli_bad_window_bits_is_usage_error() {
    let (dir, input) = make_temp_input();
    let output = infback(dir.path()).args(["-w", "20"]).arg(&input).output().unwrap();
    assert!(!output.status.success());
}

// ── 8. Several files ─────────────────────────────────────────────────────────

#[test]
fn test_cli_multiple_files_with_jobs() {
    let dir = TempDir::new().unwrap();
    let mut names = Vec::new();
    for i in 0..5 {
        let name = format!("part{}.deflate", i);
        fs::write(dir.path().join(&name), deflate(format!("part {}\n", i).as_bytes())).unwrap();
        names.push(name);
    }
    let status = infback(dir.path()).args(["-j", "3"]).args(&names).status().unwrap();
    assert!(status.success());
    for i in 0..5 {
        let out = fs::read(dir.path().join(format!("part{}", i))).unwrap();
        assert_eq!(out, format!("part {}\n", i).as_bytes());
    }
}

#[test]
fn test_cli_missing_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let status = infback(dir.path()).arg("-q").arg("nope.deflate").status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = infback(dir.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
