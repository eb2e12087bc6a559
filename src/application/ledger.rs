use super::WriteGate;
use crate::domain::account::{Account, AccountHandle, AccountId, Amount, Balance, Receipt};
use crate::domain::ports::AccountStoreRef;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use tracing::instrument;

/// Mutates balances under the non-negative invariant.
///
/// Every mutating call holds the store-wide write gate from the first read
/// until the commit returns, so the check-then-write sequence cannot
/// interleave with another operation. Validation failures never reach the
/// store; a failed commit leaves the caller's handle untouched.
pub struct LedgerEngine {
    store: AccountStoreRef,
    gate: WriteGate,
}

impl LedgerEngine {
    pub fn new(store: AccountStoreRef, gate: WriteGate) -> Self {
        Self { store, gate }
    }

    /// Loads the persisted record behind a handle.
    async fn load(&self, id: AccountId) -> Result<Account> {
        let account = self
            .store
            .get(id)
            .await?
            .ok_or(LedgerError::UnknownAccount(id))?;
        account.ensure_solvent()?;
        Ok(account)
    }

    #[instrument(skip(self, account), fields(account = %account.id))]
    pub async fn deposit(&self, account: &mut AccountHandle, amount: Decimal) -> Result<Balance> {
        let amount = Amount::new(amount)?;

        let _guard = self.gate.lock().await;
        let mut record = self.load(account.id).await?;
        let balance = record.deposit(amount)?;
        self.store.store(record).await?;

        account.balance = balance;
        tracing::debug!(%balance, "deposit committed");
        Ok(balance)
    }

    #[instrument(skip(self, account), fields(account = %account.id))]
    pub async fn withdraw(&self, account: &mut AccountHandle, amount: Decimal) -> Result<Balance> {
        let amount = Amount::new(amount)?;

        let _guard = self.gate.lock().await;
        let mut record = self.load(account.id).await?;
        let balance = record.withdraw(amount)?;
        self.store.store(record).await?;

        account.balance = balance;
        tracing::debug!(%balance, "withdrawal committed");
        Ok(balance)
    }

    /// Moves `amount` from `source` to `destination` in one atomic commit.
    ///
    /// Checks run in order: amount sign, source funds, destination existence.
    /// A self-transfer passes the same checks and then commits nothing.
    #[instrument(skip(self, source), fields(source = %source.id))]
    pub async fn transfer(
        &self,
        source: &mut AccountHandle,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<Receipt> {
        let amount = Amount::new(amount)?;

        let _guard = self.gate.lock().await;
        let mut debited = self.load(source.id).await?;
        if Balance::from(amount) > debited.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount.into(),
                available: debited.balance,
            });
        }

        let mut credited = match self.store.get(destination).await? {
            Some(account) => account,
            None => return Err(LedgerError::UnknownDestination(destination)),
        };
        credited.ensure_solvent()?;

        if debited.id == credited.id {
            source.balance = debited.balance;
            tracing::debug!("self-transfer, nothing to commit");
            return Ok(Receipt {
                source: debited.id,
                destination,
                amount,
                source_balance: debited.balance,
                destination_balance: debited.balance,
            });
        }

        let source_balance = debited.withdraw(amount)?;
        let destination_balance = credited.deposit(amount)?;
        self.store.store_all(vec![debited, credited]).await?;

        source.balance = source_balance;
        tracing::info!(%destination, %amount, "transfer committed");
        Ok(Receipt {
            source: source.id,
            destination,
            amount,
            source_balance,
            destination_balance,
        })
    }

    /// Reads the persisted balance; use it to refresh a stale handle.
    pub async fn current_balance(&self, account: &AccountHandle) -> Result<Balance> {
        Ok(self.load(account.id).await?.balance)
    }
}
