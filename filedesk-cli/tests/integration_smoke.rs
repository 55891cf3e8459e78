//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn filedesk(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("filedesk").unwrap();
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("FILEDESK_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("filedesk").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("shell"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_login_help() {
    let mut cmd = Command::cargo_bin("filedesk").unwrap();
    cmd.arg("login").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("prompted when omitted"));
}

// === Config ===

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    filedesk(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"http://127.0.0.1:5000\""))
        .stdout(predicate::str::contains("dashboard_path = \"/dashboard\""));

    // Second init without --force refuses to overwrite
    filedesk(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_show_applies_endpoint_override() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .args(["--endpoint", "https://files.example.com", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"https://files.example.com\""));
}

#[test]
fn test_bad_endpoint_override_is_rejected_up_front() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .args(["--endpoint", "ftp://x", "login", "ada", "-p", "pw"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("!").not())
        .stderr(predicate::str::contains("server.endpoint must be an http(s) URL"));
}

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// === Shell (offline commands only) ===

#[test]
fn test_shell_switches_forms_and_stubs_delete() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .arg("shell")
        .write_stdin("show signupForm\nfiles\ndelete \"old report.pdf\"\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("* signupForm"))
        .stdout(predicate::str::contains("  loginForm"))
        .stdout(predicate::str::contains("(no files)"))
        .stdout(predicate::str::contains("! Delete file: old report.pdf"))
        .stdout(predicate::str::contains("location: /"));
}

#[test]
fn test_shell_upload_without_selection_alerts() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .arg("shell")
        .write_stdin("upload\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! Please select a file to upload."));
}

#[test]
fn test_shell_reports_bad_input_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .arg("shell")
        .write_stdin("frobnicate\nrename\nforms\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("usage: rename <file>"))
        .stdout(predicate::str::contains("* loginForm"));
}

// === Flows against an unreachable server ===

#[test]
fn test_login_against_unreachable_server_fails_with_generic_alert() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .args(["--endpoint", "http://127.0.0.1:1", "login", "ada", "-p", "pw"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("! An error occurred. Please try again."));
}

#[test]
fn test_alerts_drop_terminal_control_bytes() {
    let dir = tempfile::tempdir().unwrap();

    filedesk(&dir)
        .arg("shell")
        .write_stdin("delete \"\u{1b}[31mred.txt\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! Delete file: [31mred.txt"))
        .stdout(predicate::str::contains("\u{1b}").not());
}
