use super::WriteGate;
use crate::domain::account::{Account, AccountHandle, AccountId, Amount, Balance, NewAccount};
use crate::domain::credential::SecretHasher;
use crate::domain::ports::AccountStoreRef;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

/// Registers accounts and verifies login attempts.
///
/// Secrets only ever exist here as arguments; the store sees PHC hashes.
pub struct CredentialStore {
    store: AccountStoreRef,
    gate: WriteGate,
    hasher: SecretHasher,
    /// Verified against when the owner is unknown, so both failure paths cost
    /// one Argon2 evaluation. Stored hashes are upgraded to the current costs
    /// on login, so over time real records cost the same as the decoy.
    decoy_hash: String,
}

impl CredentialStore {
    pub fn new(store: AccountStoreRef, gate: WriteGate, hasher: SecretHasher) -> Result<Self> {
        let decoy_hash = hasher.hash("pocketbank-decoy")?;
        Ok(Self {
            store,
            gate,
            hasher,
            decoy_hash,
        })
    }

    /// Creates an account and returns its number.
    #[instrument(skip_all, fields(owner = %owner_name))]
    pub async fn register(
        &self,
        owner_name: &str,
        secret: &str,
        opening_balance: Decimal,
    ) -> Result<AccountId> {
        let owner_name = owner_name.trim();
        if owner_name.is_empty() {
            return Err(LedgerError::InvalidCredential(
                "owner name must not be empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(LedgerError::InvalidCredential(
                "secret must not be empty".to_string(),
            ));
        }
        let opening_balance = Amount::new(opening_balance)?;

        let credential_hash = self.hasher.hash(secret)?;

        let _guard = self.gate.lock().await;
        if self.store.find_by_owner(owner_name).await?.is_some() {
            return Err(LedgerError::DuplicateOwner(owner_name.to_string()));
        }
        let account = self
            .store
            .insert(NewAccount {
                owner_name: owner_name.to_string(),
                credential_hash,
                balance: Balance::from(opening_balance),
                opened_at: Utc::now(),
            })
            .await?;

        tracing::info!(account = %account.id, "account registered");
        Ok(account.id)
    }

    /// Verifies `secret` for `owner_name` and returns a fresh handle.
    ///
    /// Unknown owner and wrong secret both yield `AuthFailed`.
    #[instrument(skip_all, fields(owner = %owner_name))]
    pub async fn authenticate(&self, owner_name: &str, secret: &str) -> Result<AccountHandle> {
        let account = self.store.find_by_owner(owner_name.trim()).await?;

        let verified = match &account {
            Some(account) => self.hasher.verify(&account.credential_hash, secret),
            None => {
                let _ = self.hasher.verify(&self.decoy_hash, secret);
                false
            }
        };

        match account {
            Some(account) if verified => {
                account.ensure_solvent()?;
                let account = self.upgrade_hash(account, secret).await;
                tracing::debug!(account = %account.id, "authenticated");
                Ok(account.handle())
            }
            _ => {
                tracing::warn!("authentication failed");
                Err(LedgerError::AuthFailed)
            }
        }
    }
}

impl CredentialStore {
    /// Rehashes a verified secret when its record predates the current costs.
    ///
    /// Failures are logged and swallowed; the login itself already succeeded.
    async fn upgrade_hash(&self, account: Account, secret: &str) -> Account {
        if !self.hasher.needs_rehash(&account.credential_hash) {
            return account;
        }
        let credential_hash = match self.hasher.hash(secret) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(account = %account.id, error = %e, "credential rehash failed");
                return account;
            }
        };

        let _guard = self.gate.lock().await;
        let mut current = match self.store.get(account.id).await {
            Ok(Some(current)) if current.credential_hash == account.credential_hash => current,
            Ok(_) => return account,
            Err(e) => {
                tracing::warn!(account = %account.id, error = %e, "credential rehash failed");
                return account;
            }
        };
        current.credential_hash = credential_hash;
        match self.store.store(current.clone()).await {
            Ok(()) => {
                tracing::info!(account = %current.id, "credential rehashed with current costs");
                current
            }
            Err(e) => {
                tracing::warn!(account = %current.id, error = %e, "credential rehash failed");
                account
            }
        }
    }
}
