//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Get path to the cipherkey binary
fn cipherkey_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cipherkey"))
}

fn run_cipherkey(args: &[&str]) -> Output {
    Command::new(cipherkey_bin())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run cipherkey")
}

/// Run cipherkey with the key piped through stdin
fn run_cipherkey_with_key(args: &[&str], key: &str) -> Output {
    let mut child = Command::new(cipherkey_bin())
        .arg("check")
        .arg("--key-stdin")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cipherkey");

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        let _ = stdin.write_all(key.as_bytes());
    }

    child.wait_with_output().expect("failed to wait for cipherkey")
}

#[test]
fn test_valid_shift_key() {
    let result = run_cipherkey(&["check", "--algorithm", "shift", "--key", "3"]);
    assert!(
        result.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.starts_with("ok: Shift Cipher (shift) in text mode"), "{}", stdout);
}

#[test]
fn test_invalid_affine_key_is_cancelled() {
    let result = run_cipherkey(&["check", "-a", "affine", "-k", "4,8"]);
    assert_eq!(result.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("• For affine text-mode, a must be coprime with 26."),
        "{}",
        stderr
    );
}

#[test]
fn test_every_violation_is_listed() {
    let result = run_cipherkey(&["check", "--mode", "file", "--algorithm", "affine", "--key", "2,5"]);
    assert_eq!(result.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&result.stderr);
    let bullets: Vec<&str> = stderr.lines().filter(|l| l.starts_with("• ")).collect();
    assert_eq!(bullets.len(), 2, "{}", stderr);
    assert!(bullets[0].contains("choose a file"));
    assert!(bullets[1].contains("coprime with 256"));
}

#[test]
fn test_key_from_stdin() {
    let result = run_cipherkey_with_key(&["--algorithm", "vigenere"], "LEMON\n");
    assert!(
        result.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(String::from_utf8_lossy(&result.stdout).contains("key: 5 characters"));
}

#[test]
fn test_hill_matrix() {
    let result = run_cipherkey(&["check", "-a", "hill", "--hill", "1,2,3,5"]);
    assert!(
        result.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(String::from_utf8_lossy(&result.stdout).contains("hill: 1,2,3,5"));

    let result = run_cipherkey(&["check", "-a", "hill", "--hill", "2,4,6,8"]);
    assert_eq!(result.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&result.stderr).contains("determinant"));
}

#[test]
fn test_hill_values_overflowing_grid() {
    let result = run_cipherkey(&["check", "-a", "hill", "--hill-size", "2", "--hill", "1,0,0,1,0"]);
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.starts_with("Error: invalid --hill value #5"), "{}", stderr);
}

#[test]
fn test_hill_size_out_of_bounds() {
    for size in ["11", "4294967296"] {
        let result = run_cipherkey(&["check", "-a", "hill", "--hill-size", size, "--hill", "1"]);
        assert_eq!(result.status.code(), Some(1), "size {}", size);
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.starts_with("Error:"), "{}", stderr);
        assert!(stderr.contains("between 1 and 10"), "{}", stderr);
    }
}

#[test]
fn test_file_mode_with_files() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("photo.png");
    let key = temp_dir.path().join("key.bin");
    fs::write(&data, [0x89, 0x50, 0x4e, 0x47]).unwrap();
    fs::write(&key, b"anything").unwrap();

    let result = run_cipherkey(&[
        "check",
        "--mode",
        "file",
        "--algorithm",
        "permutation",
        "--key-file",
        key.to_str().unwrap(),
        "--data-file",
        data.to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("key file: key.bin"));
    assert!(stdout.contains("data file: photo.png"));
}

#[test]
fn test_file_mode_rejects_playfair() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("letter.txt");
    fs::write(&data, b"attack at dawn").unwrap();

    let result = run_cipherkey(&[
        "check",
        "--mode",
        "file",
        "--algorithm",
        "playfair",
        "--key",
        "MONARCHY",
        "--data-file",
        data.to_str().unwrap(),
    ]);
    assert_eq!(result.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&result.stderr)
            .contains("Algorithm \"playfair\" does not support file mode.")
    );
}

#[test]
fn test_missing_data_file_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.bin");
    let result = run_cipherkey(&[
        "check",
        "--mode",
        "file",
        "--algorithm",
        "shift",
        "--key",
        "3",
        "--data-file",
        missing.to_str().unwrap(),
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("failed to read from"));
}

#[test]
fn test_unknown_algorithm_rejected() {
    let result = run_cipherkey(&["check", "--algorithm", "enigma", "--key", "3"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("unknown algorithm"));
}

#[test]
fn test_prompt_requires_terminal() {
    let result = run_cipherkey(&["check", "--algorithm", "otp", "--prompt-key"]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("stdin is not a terminal"));
}

#[test]
fn test_list_algorithms() {
    let result = run_cipherkey(&["algorithms", "--mode", "file"]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["shift", "substitution", "affine", "permutation", "otp"]);

    let result = run_cipherkey(&["algorithms"]);
    assert_eq!(String::from_utf8_lossy(&result.stdout).lines().count(), 8);
}

#[test]
fn test_preview_key() {
    let temp_dir = TempDir::new().unwrap();
    let pad = temp_dir.path().join("pad.txt");
    fs::write(&pad, "XMCKL".repeat(100)).unwrap();

    let result = run_cipherkey(&["preview-key", pad.to_str().unwrap()]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(stdout.trim_end().len(), 200);
}
