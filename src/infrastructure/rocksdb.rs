use crate::domain::account::{Account, AccountId, NewAccount};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch, WriteOptions};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for account records, keyed by big-endian id.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family mapping owner names to account ids.
pub const CF_OWNERS: &str = "owners";
/// Column Family for store metadata such as the id counter.
pub const CF_META: &str = "meta";

const NEXT_ID_KEY: &[u8] = b"next_id";

/// A persistent store implementation using RocksDB.
///
/// Every commit is a single synced `WriteBatch`, so multi-record updates and
/// the owner index never diverge from the account records.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ACCOUNTS, CF_OWNERS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| LedgerError::storage(format!("{name} column family not found")))
    }

    fn sync_writes() -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(true);
        opts
    }

    fn next_id(&self) -> Result<u64> {
        let meta = self.cf(CF_META)?;
        match self.db.get_cf(meta, NEXT_ID_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| LedgerError::storage("malformed id counter"))?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(1),
        }
    }

    fn read_account(&self, id: AccountId) -> Result<Option<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountStore for RocksDbStore {
    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let _guard = self.writer.lock().await;
        let owners = self.cf(CF_OWNERS)?;

        if self
            .db
            .get_pinned_cf(owners, account.owner_name.as_bytes())?
            .is_some()
        {
            return Err(LedgerError::DuplicateOwner(account.owner_name));
        }

        let id = self.next_id()?;
        let account = account.with_id(AccountId(id));

        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_ACCOUNTS)?,
            id.to_be_bytes(),
            serde_json::to_vec(&account)?,
        );
        batch.put_cf(owners, account.owner_name.as_bytes(), id.to_be_bytes());
        batch.put_cf(self.cf(CF_META)?, NEXT_ID_KEY, (id + 1).to_be_bytes());
        self.db.write_opt(&batch, &Self::sync_writes())?;

        Ok(account)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        self.read_account(id)
    }

    async fn find_by_owner(&self, owner_name: &str) -> Result<Option<Account>> {
        let owners = self.cf(CF_OWNERS)?;
        let Some(bytes) = self.db.get_pinned_cf(owners, owner_name.as_bytes())? else {
            return Ok(None);
        };
        let raw: [u8; 8] = bytes
            .as_ref()
            .try_into()
            .map_err(|_| LedgerError::storage("malformed owner index entry"))?;
        self.read_account(AccountId(u64::from_be_bytes(raw)))
    }

    async fn store_all(&self, accounts: Vec<Account>) -> Result<()> {
        let _guard = self.writer.lock().await;
        let cf = self.cf(CF_ACCOUNTS)?;

        let mut batch = WriteBatch::default();
        for account in &accounts {
            if self.db.get_pinned_cf(cf, account.id.0.to_be_bytes())?.is_none() {
                return Err(LedgerError::storage(format!(
                    "cannot update account {} which was never inserted",
                    account.id
                )));
            }
            batch.put_cf(cf, account.id.0.to_be_bytes(), serde_json::to_vec(account)?);
        }
        self.db.write_opt(&batch, &Self::sync_writes())?;
        Ok(())
    }
}
