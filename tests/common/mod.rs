#![allow(dead_code)]

use assert_cmd::cargo_bin;
use pocketbank::BankContext;
use pocketbank::domain::credential::{HashingParams, SecretHasher};
use pocketbank::infrastructure::in_memory::InMemoryAccountStore;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// Cheapest Argon2 parameters the crate accepts; keeps tests fast.
pub fn fast_hashing() -> HashingParams {
    HashingParams::new(8, 1, 1)
}

pub fn in_memory_bank() -> BankContext {
    let hasher = SecretHasher::new(fast_hashing()).expect("valid hashing params");
    BankContext::with_store(Arc::new(InMemoryAccountStore::new()), hasher)
        .expect("Failed to build bank context")
}

/// Writes a settings.json with cheap hashing into `data_dir`.
pub fn write_fast_settings(data_dir: &Path) {
    std::fs::create_dir_all(data_dir).unwrap();
    std::fs::write(
        data_dir.join("settings.json"),
        r#"{ "hashing": { "memoryKib": 8, "iterations": 1, "parallelism": 1 } }"#,
    )
    .unwrap();
}

/// A `pocketbank` invocation against `data_dir`, isolated from the caller's env.
pub fn pocketbank(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("pocketbank"));
    cmd.env_remove("POCKETBANK_BACKEND")
        .env_remove("POCKETBANK_SECRET")
        .env_remove("POCKETBANK_DATA_DIR")
        .env("RUST_LOG", "warn")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}
