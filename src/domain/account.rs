use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public account number, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Represents a monetary value held by an account.
///
/// This is a wrapper around `rust_decimal::Decimal` so balances never touch
/// floating point. Arithmetic is checked; callers decide what an overflow
/// means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.0).map(Self)
    }

    pub fn checked_sub(self, amount: Amount) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative monetary amount for ledger operations.
///
/// Zero is accepted: depositing or moving nothing is a valid no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            Err(LedgerError::InvalidAmount(format!(
                "{value} is negative"
            )))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The persisted account record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    /// Store-assigned identifier, immutable after creation.
    pub id: AccountId,
    /// Login key; unique across the store.
    pub owner_name: String,
    /// PHC-encoded Argon2id hash of the owner's secret.
    pub credential_hash: String,
    /// Current funds, never negative at rest.
    pub balance: Balance,
    /// Set once at registration.
    pub opened_at: DateTime<Utc>,
}

impl Account {
    /// Fails when a record was persisted with a negative balance.
    pub fn ensure_solvent(&self) -> Result<()> {
        if self.balance.is_negative() {
            return Err(LedgerError::storage(format!(
                "account {} holds a negative balance at rest",
                self.id
            )));
        }
        Ok(())
    }

    /// Credits the balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Balance> {
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("{amount} overflows the balance of account {}", self.id))
        })?;
        Ok(self.balance)
    }

    /// Debits the balance if sufficient funds are available.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Balance> {
        let requested = Balance::from(amount);
        if requested > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested,
                available: self.balance,
            });
        }
        self.balance = self.balance.checked_sub(amount).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("{amount} underflows the balance of account {}", self.id))
        })?;
        Ok(self.balance)
    }

    pub fn handle(&self) -> AccountHandle {
        AccountHandle {
            id: self.id,
            balance: self.balance,
        }
    }
}

/// A registration ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub owner_name: String,
    pub credential_hash: String,
    pub balance: Balance,
    pub opened_at: DateTime<Utc>,
}

impl NewAccount {
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            owner_name: self.owner_name,
            credential_hash: self.credential_hash,
            balance: self.balance,
            opened_at: self.opened_at,
        }
    }
}

/// What a logged-in caller holds: the account number and a cached balance.
///
/// The cached balance may be stale; ledger operations always work from the
/// persisted record and refresh it on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountHandle {
    pub id: AccountId,
    pub balance: Balance,
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub source_balance: Balance,
    pub destination_balance: Balance,
}
