//! pocketbank: a personal-banking record keeper.
//!
//! - **domain**: accounts, amounts, credential hashing and the storage port
//! - **application**: `CredentialStore` and `LedgerEngine`, wired by `BankContext`
//! - **infrastructure**: in-memory, JSON file and RocksDB stores

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;

pub use application::BankContext;
pub use application::credentials::CredentialStore;
pub use application::ledger::LedgerEngine;
pub use config::{Backend, Config};
pub use domain::account::{AccountHandle, AccountId, Amount, Balance, Receipt};
pub use error::{LedgerError, Result};
