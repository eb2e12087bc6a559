use super::account::{Account, AccountId, NewAccount};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable home of every `Account` record.
///
/// Implementations must make `insert` and `store_all` all-or-nothing: after
/// an error, no record passed to the call may appear changed.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Assigns the next id, persists the record and returns it.
    ///
    /// Fails with `DuplicateOwner` if the owner name is already taken.
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    async fn get(&self, id: AccountId) -> Result<Option<Account>>;

    async fn find_by_owner(&self, owner_name: &str) -> Result<Option<Account>>;

    /// Atomically replaces every given record. All ids must already exist.
    async fn store_all(&self, accounts: Vec<Account>) -> Result<()>;

    async fn store(&self, account: Account) -> Result<()> {
        self.store_all(vec![account]).await
    }
}

pub type AccountStoreRef = Arc<dyn AccountStore>;
