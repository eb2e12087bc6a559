use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

mod common;

fn registered_ana() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());
    common::pocketbank(dir.path())
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .args(["--opening-balance", "10"])
        .assert()
        .success();
    dir
}

#[test]
fn test_wrong_secret_and_unknown_name_fail_identically() {
    let dir = registered_ana();

    let wrong_secret = common::pocketbank(dir.path())
        .args(["login", "--name", "ana", "--secret", "nope"])
        .output()
        .unwrap();
    let unknown_name = common::pocketbank(dir.path())
        .args(["login", "--name", "zoe", "--secret", "hunter2"])
        .output()
        .unwrap();

    assert!(!wrong_secret.status.success());
    assert!(!unknown_name.status.success());
    assert_eq!(wrong_secret.status.code(), unknown_name.status.code());
    assert_eq!(wrong_secret.stdout, unknown_name.stdout);

    let stderr = String::from_utf8_lossy(&wrong_secret.stderr);
    assert!(stderr.contains("Authentication failed"));
    let stderr = String::from_utf8_lossy(&unknown_name.stderr);
    assert!(stderr.contains("Authentication failed"));
}

#[test]
fn test_negative_amount_is_rejected_without_change() {
    let dir = registered_ana();

    common::pocketbank(dir.path())
        .args(["deposit", "--name", "ana", "--secret", "hunter2", "--amount", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));

    common::pocketbank(dir.path())
        .args(["balance", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("balance 10"));
}

#[test]
fn test_errors_reach_stderr_as_diagnostics() {
    let dir = registered_ana();

    common::pocketbank(dir.path())
        .args(["login", "--name", "ana", "--secret", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pocketbank::auth_failed"))
        .stderr(predicate::str::contains("check the name and secret"));
}

#[test]
fn test_negative_opening_balance_is_rejected() {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());

    common::pocketbank(dir.path())
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .args(["--opening-balance", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let dir = registered_ana();

    common::pocketbank(dir.path())
        .args(["register", "--name", "ana", "--secret", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_data_types() {
    let dir = registered_ana();

    common::pocketbank(dir.path())
        .args(["deposit", "--name", "ana", "--secret", "hunter2"])
        .args(["--amount", "not_a_number"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    common::pocketbank(dir.path())
        .args(["transfer", "--name", "ana", "--secret", "hunter2"])
        .args(["--to", "abc", "--amount", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
