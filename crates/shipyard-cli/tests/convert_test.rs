#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn shipyard() -> Command {
    let mut cmd = Command::cargo_bin("shipyard").unwrap();
    cmd.env_remove("SHIPYARD_INPUT")
        .env_remove("SHIPYARD_AUTHZ_ENDPOINT")
        .env_remove("SHIPYARD_AUTHZ_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_convert_golden_orion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship.yaml");
    fs::write(&path, "name: \"Orion\"\ncrew: 5\n").unwrap();

    shipyard()
        .arg("convert")
        .arg(&path)
        .assert()
        .success()
        .stdout("{\n    \"crew\": 5,\n    \"name\": \"Orion\"\n}\n");
}

#[test]
fn test_convert_reads_stdin() {
    shipyard()
        .args(["convert", "-"])
        .write_stdin("b: [2, 1]\na: null\n")
        .assert()
        .success()
        .stdout("{\n    \"a\": null,\n    \"b\": [\n        2,\n        1\n    ]\n}\n");
}

#[test]
fn test_convert_path_from_env() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship.yaml");
    fs::write(&path, "name: Vega\n").unwrap();

    shipyard()
        .arg("convert")
        .env("SHIPYARD_INPUT", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Vega\""));
}

#[test]
fn test_convert_ascii_escapes_and_unicode_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship.yaml");
    fs::write(&path, "name: Protée\n").unwrap();

    shipyard()
        .arg("convert")
        .arg(&path)
        .assert()
        .success()
        .stdout("{\n    \"name\": \"Prot\\u00e9e\"\n}\n");

    shipyard()
        .arg("convert")
        .arg(&path)
        .args(["--unicode", "--indent", "2"])
        .assert()
        .success()
        .stdout("{\n  \"name\": \"Protée\"\n}\n");
}

#[test]
fn test_convert_missing_file_exits_3() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship2.zaml");

    shipyard()
        .arg("convert")
        .arg(&path)
        .assert()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("fatal: failed to read"));
}

#[test]
fn test_convert_invalid_yaml_exits_3() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "name: [Orion\n").unwrap();

    shipyard()
        .arg("convert")
        .arg(&path)
        .assert()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("YAML parse error"));
}

#[test]
fn test_convert_bad_check_query_is_usage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship.yaml");
    fs::write(&path, "name: Orion\n").unwrap();

    shipyard()
        .arg("convert")
        .arg(&path)
        .args(["--check", "starship:orion"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid reference"));
}

#[test]
fn test_missing_path_is_usage_error() {
    shipyard().arg("convert").assert().code(2);
}

#[test]
fn test_convert_reads_its_own_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spaceship.yaml");
    fs::write(&path, "name: Orion\nbadge: \"🚀\"\n").unwrap();

    let first = shipyard().arg("convert").arg(&path).output().unwrap();
    assert!(first.status.success());
    let converted = dir.path().join("spaceship.json");
    fs::write(&converted, &first.stdout).unwrap();

    shipyard()
        .arg("convert")
        .arg(&converted)
        .assert()
        .success()
        .stdout(String::from_utf8(first.stdout).unwrap());
}
