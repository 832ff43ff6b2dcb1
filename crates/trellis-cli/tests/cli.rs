use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn trellis() -> Command {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.env_remove("TRELLO_API_KEY")
        .env_remove("TRELLO_TOKEN")
        .env_remove("TRELLIS_DEBUG_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    trellis()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--offline"))
        .stdout(predicate::str::contains("--sync-interval"));
}

#[test]
fn test_version() {
    trellis()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_credentials_fail_before_launch() {
    let home = tempdir().unwrap();
    trellis()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRELLO_API_KEY"));
}

#[test]
fn test_missing_token_is_reported() {
    let home = tempdir().unwrap();
    trellis()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["--api-key", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRELLO_TOKEN"));
}

#[test]
fn test_conflicting_mouse_flags_rejected() {
    trellis()
        .args(["--offline", "--mouse", "--no-mouse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_warnings_stay_off_the_terminal_without_log_path() {
    let home = tempdir().unwrap();
    let config_dir = home.path().join("trellis");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.json"), "{ not json").unwrap();

    trellis()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to load config").not());
}

#[test]
fn test_debug_log_path_receives_warnings() {
    let home = tempdir().unwrap();
    let config_dir = home.path().join("trellis");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.json"), "{ not json").unwrap();
    let log_path = home.path().join("debug.log");

    trellis()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("TRELLIS_DEBUG_LOG", &log_path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Failed to load config"));
}
