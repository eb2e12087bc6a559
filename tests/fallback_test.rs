use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());

    common::pocketbank(dir.path())
        .args(["--backend", "rocksdb"])
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("'storage-rocksdb' feature is not enabled"));

    // The fallback writes to the JSON snapshot.
    assert!(dir.path().join("accounts.json").exists());
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());

    common::pocketbank(dir.path())
        .args(["--backend", "rocksdb"])
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("feature is not enabled").not());
}

#[test]
fn test_backend_from_environment() {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());

    common::pocketbank(dir.path())
        .env("POCKETBANK_BACKEND", "file")
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success();
    assert!(dir.path().join("accounts.json").exists());

    common::pocketbank(dir.path())
        .env("POCKETBANK_BACKEND", "postgres")
        .args(["login", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}
