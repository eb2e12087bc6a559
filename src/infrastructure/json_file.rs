use super::in_memory::Snapshot;
use crate::domain::account::{Account, AccountId, NewAccount};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// File name of the snapshot inside the data directory.
pub const ACCOUNTS_FILE: &str = "accounts.json";

/// A durable store that keeps every account in one JSON snapshot file.
///
/// Each commit serializes the candidate snapshot to a temp file in the same
/// directory, fsyncs it and renames it over the previous snapshot. The
/// in-memory copy is only swapped after the rename succeeds, so a failed write
/// leaves both disk and memory at the previous state.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Arc<RwLock<Snapshot>>,
}

impl JsonFileStore {
    /// Opens the snapshot in `data_dir`, creating the directory if missing.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(ACCOUNTS_FILE);

        let snapshot = if path.exists() {
            let file = fs::File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            Snapshot::default()
        };

        tracing::debug!(
            path = %path.display(),
            accounts = snapshot.accounts.len(),
            "opened account snapshot"
        );

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(snapshot)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| LedgerError::storage("snapshot path has no parent directory"))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, snapshot)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        sync_dir(dir)
    }
}

/// Flushes a directory entry so a rename inside it survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[async_trait]
impl AccountStore for JsonFileStore {
    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let mut state = self.state.write().await;
        let mut candidate = state.clone();
        let account = candidate.insert(account)?;
        self.persist(&candidate)?;
        *state = candidate;
        Ok(account)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id.0).cloned())
    }

    async fn find_by_owner(&self, owner_name: &str) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.find_by_owner(owner_name).cloned())
    }

    async fn store_all(&self, accounts: Vec<Account>) -> Result<()> {
        let mut state = self.state.write().await;
        let mut candidate = state.clone();
        candidate.replace_all(accounts)?;
        self.persist(&candidate)?;
        *state = candidate;
        Ok(())
    }
}
