#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Nothing listens on the discard port, so requests fail fast.
const DEAD_SERVER: &str = "http://127.0.0.1:9/api";

fn pessoas_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("pessoas"));
    cmd.env("PESSOAS_CONFIG_DIR", config_dir.path())
        .env_remove("PESSOAS_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_command_groups() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Browse:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn blank_name_is_rejected_before_any_request() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .args(["--base-url", DEAD_SERVER, "create", "   ", "30"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Nome é obrigatório"));
}

#[test]
fn out_of_range_age_is_rejected() {
    let temp = TempDir::new().unwrap();
    for age in ["151", "-1", "abc", "12.5"] {
        pessoas_cmd(&temp)
            .args(["--base-url", DEAD_SERVER, "create", "Ana", age])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Idade deve ser um número entre 0 e 150",
            ));
    }
}

#[test]
fn update_validates_before_loading() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .args(["--base-url", DEAD_SERVER, "update", "1", "", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nome é obrigatório"));
}

#[test]
fn unreachable_server_is_reported() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .args(["--base-url", DEAD_SERVER, "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn env_base_url_is_used() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .env("PESSOAS_BASE_URL", DEAD_SERVER)
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: "));
}

#[test]
fn config_set_and_get_round_trip_through_disk() {
    let temp = TempDir::new().unwrap();

    pessoas_cmd(&temp)
        .args(["config", "base-url", "http://example.test/api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base-url = http://example.test/api"));

    let saved = fs::read_to_string(temp.path().join("config.json")).unwrap();
    assert!(saved.contains("http://example.test/api"));

    pessoas_cmd(&temp)
        .args(["config", "base-url"])
        .assert()
        .success()
        .stdout("http://example.test/api\n");

    pessoas_cmd(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("poll-interval-secs = 30"));
}

#[test]
fn unknown_config_key_fails() {
    let temp = TempDir::new().unwrap();
    pessoas_cmd(&temp)
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
}

#[test]
fn broken_config_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.json"), "{ not json").unwrap();
    pessoas_cmd(&temp)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
