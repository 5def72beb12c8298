use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_every_option() {
    let mut cmd = Command::cargo_bin("silo").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--directory"))
        .stdout(predicate::str::contains("--bucket"))
        .stdout(predicate::str::contains("--cluster-id"))
        .stdout(predicate::str::contains("--db-name"))
        .stdout(predicate::str::contains("--user"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--role-name"))
        .stdout(predicate::str::contains("--region"));
}

#[test]
fn defaults_are_shown_in_help() {
    let mut cmd = Command::cargo_bin("silo").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("RedshiftS3AccessRole"))
        .stdout(predicate::str::contains("us-east-1"));
}

#[test]
fn missing_required_options_fail() {
    let mut cmd = Command::cargo_bin("silo").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn version_flag_works() {
    let mut cmd = Command::cargo_bin("silo").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("silo"));
}
