use assert_cmd::prelude::*;
use pocketbank::infrastructure::json_file::ACCOUNTS_FILE;
use predicates::prelude::*;
use tempfile::tempdir;

mod common;

#[test]
fn test_file_store_persistence_recovery() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("bank");
    common::write_fast_settings(&data_dir);

    // 1. First run: open an account
    common::pocketbank(&data_dir)
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .args(["--opening-balance", "100.0"])
        .assert()
        .success();

    // 2. Second run: deposit against the persisted record
    common::pocketbank(&data_dir)
        .args(["deposit", "--name", "ana", "--secret", "hunter2", "--amount", "50.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("balance 150.0"));

    // 3. Third run: the deposit was durable
    common::pocketbank(&data_dir)
        .args(["balance", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("balance 150.0"));

    let snapshot = std::fs::read_to_string(data_dir.join(ACCOUNTS_FILE)).unwrap();
    assert!(snapshot.contains("\"owner_name\": \"ana\""));
    assert!(snapshot.contains("$argon2id$"));
    assert!(!snapshot.contains("hunter2"), "secret must never be stored");
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    common::write_fast_settings(dir.path());

    common::pocketbank(dir.path())
        .args(["--backend", "rocksdb"])
        .args(["register", "--name", "ana", "--secret", "hunter2"])
        .args(["--opening-balance", "100.0"])
        .assert()
        .success();

    common::pocketbank(dir.path())
        .args(["--backend", "rocksdb"])
        .args(["deposit", "--name", "ana", "--secret", "hunter2", "--amount", "50.0"])
        .assert()
        .success();

    common::pocketbank(dir.path())
        .args(["--backend", "rocksdb"])
        .args(["balance", "--name", "ana", "--secret", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("balance 150.0"));
}
