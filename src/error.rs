use crate::domain::account::{AccountId, Balance};
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every failure a ledger or credential operation can report.
///
/// Validation variants are raised before any write and are safe to retry with
/// corrected input. Only `StorageFailure` may leave it unclear whether a write
/// landed. `Hashing` is raised before the store is touched.
#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    #[diagnostic(code(pocketbank::invalid_amount))]
    InvalidAmount(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    #[diagnostic(code(pocketbank::insufficient_funds))]
    InsufficientFunds { requested: Balance, available: Balance },

    #[error("Destination account {0} does not exist")]
    #[diagnostic(code(pocketbank::unknown_destination))]
    UnknownDestination(AccountId),

    #[error("Account {0} does not exist")]
    #[diagnostic(
        code(pocketbank::unknown_account),
        help("log in again to refresh the account handle")
    )]
    UnknownAccount(AccountId),

    #[error("Authentication failed")]
    #[diagnostic(code(pocketbank::auth_failed), help("check the name and secret"))]
    AuthFailed,

    #[error("Invalid credential: {0}")]
    #[diagnostic(code(pocketbank::invalid_credential))]
    InvalidCredential(String),

    #[error("An account owned by '{0}' already exists")]
    #[diagnostic(code(pocketbank::duplicate_owner))]
    DuplicateOwner(String),

    #[error("Credential hashing failed: {0}")]
    #[diagnostic(code(pocketbank::hashing))]
    Hashing(String),

    #[error("Storage failure: {0}")]
    #[diagnostic(code(pocketbank::storage_failure))]
    StorageFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(pocketbank::config))]
    Config(String),
}

impl LedgerError {
    pub fn storage(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::StorageFailure(message.into())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageFailure(Box::new(err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::StorageFailure(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        Self::StorageFailure(Box::new(err))
    }
}
