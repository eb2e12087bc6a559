use crate::domain::account::{Account, AccountId, NewAccount};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The full contents of a store: every account plus the id counter.
///
/// Shared by the in-memory and file-backed stores; the file store persists it
/// verbatim.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub next_id: u64,
    pub accounts: BTreeMap<u64, Account>,
}

impl Snapshot {
    pub fn owner_exists(&self, owner_name: &str) -> bool {
        self.accounts.values().any(|a| a.owner_name == owner_name)
    }

    /// Assigns the next id to `account` and adds it.
    pub fn insert(&mut self, account: NewAccount) -> Result<Account> {
        if self.owner_exists(&account.owner_name) {
            return Err(LedgerError::DuplicateOwner(account.owner_name));
        }
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let account = account.with_id(AccountId(id));
        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    pub fn find_by_owner(&self, owner_name: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.owner_name == owner_name)
    }

    /// Replaces existing records; touches nothing if any id is unknown.
    pub fn replace_all(&mut self, accounts: Vec<Account>) -> Result<()> {
        if let Some(missing) = accounts
            .iter()
            .find(|a| !self.accounts.contains_key(&a.id.0))
        {
            return Err(LedgerError::storage(format!(
                "cannot update account {} which was never inserted",
                missing.id
            )));
        }
        for account in accounts {
            self.accounts.insert(account.id.0, account);
        }
        Ok(())
    }
}

/// A thread-safe in-memory account store.
///
/// Uses `Arc<RwLock<Snapshot>>` to allow shared concurrent access.
/// Nothing survives the process; meant for tests and scratch sessions.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    state: Arc<RwLock<Snapshot>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let mut state = self.state.write().await;
        state.insert(account)
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
        state.replace_all(accounts)
    }
}
