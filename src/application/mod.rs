//! Application layer: the credential gate and the ledger engine.
//!
//! Both services share one long-lived store handle and one write gate. The
//! gate serializes every read-modify-write against the store, which is what
//! keeps the balance invariant intact when several tasks hold handles to the
//! same account.

pub mod credentials;
pub mod ledger;

use crate::config::{Backend, Config};
use crate::domain::credential::SecretHasher;
use crate::domain::ports::AccountStoreRef;
use crate::error::Result;
use crate::infrastructure::json_file::JsonFileStore;
use credentials::CredentialStore;
use ledger::LedgerEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store-wide lock held for the duration of each mutating operation.
pub type WriteGate = Arc<Mutex<()>>;

/// Main entry point for ledger operations.
///
/// Owns the store handle for the life of the process and hands it to both
/// services.
pub struct BankContext {
    pub credentials: CredentialStore,
    pub ledger: LedgerEngine,
}

impl BankContext {
    /// Opens the configured backend under `config.data_dir`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = open_store(config)?;
        Self::with_store(store, SecretHasher::new(config.hashing)?)
    }

    /// Builds both services over an existing store.
    pub fn with_store(store: AccountStoreRef, hasher: SecretHasher) -> Result<Self> {
        let gate: WriteGate = Arc::new(Mutex::new(()));
        Ok(Self {
            credentials: CredentialStore::new(store.clone(), gate.clone(), hasher)?,
            ledger: LedgerEngine::new(store, gate),
        })
    }
}

fn open_store(config: &Config) -> Result<AccountStoreRef> {
    match config.backend {
        Backend::File => Ok(Arc::new(JsonFileStore::open(&config.data_dir)?)),
        #[cfg(feature = "storage-rocksdb")]
        Backend::Rocksdb => {
            use crate::infrastructure::rocksdb::RocksDbStore;
            Ok(Arc::new(RocksDbStore::open(config.data_dir.join("rocksdb"))?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Backend::Rocksdb => {
            tracing::warn!(
                "RocksDB storage requested, but the 'storage-rocksdb' feature is not enabled. Falling back to the JSON file store."
            );
            Ok(Arc::new(JsonFileStore::open(&config.data_dir)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::domain::credential::HashingParams;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            hashing: HashingParams::new(8, 1, 1),
            ..Config::new(dir)
        }
    }

    #[tokio::test]
    async fn test_context_round_trip_through_file_backend() {
        let dir = tempdir().unwrap();

        {
            let bank = BankContext::open(&config(dir.path())).unwrap();
            bank.credentials
                .register("ana", "hunter2", dec!(100.00))
                .await
                .unwrap();
            let mut ana = bank.credentials.authenticate("ana", "hunter2").await.unwrap();
            bank.ledger.deposit(&mut ana, dec!(0.50)).await.unwrap();
        }

        let bank = BankContext::open(&config(dir.path())).unwrap();
        let ana = bank.credentials.authenticate("ana", "hunter2").await.unwrap();
        assert_eq!(ana.balance, Balance::new(dec!(100.50)));
    }

    #[tokio::test]
    async fn test_rocksdb_backend_opens() {
        let dir = tempdir().unwrap();
        let config = Config {
            backend: Backend::Rocksdb,
            ..config(dir.path())
        };

        let bank = BankContext::open(&config).unwrap();
        let id = bank.credentials.register("ana", "pw", dec!(1)).await.unwrap();
        let ana = bank.credentials.authenticate("ana", "pw").await.unwrap();
        assert_eq!(ana.id, id);
    }
}
