//! Salted one-way hashing of account secrets.
//!
//! Secrets are hashed with Argon2id and stored as PHC strings, so the salt and
//! cost parameters travel with each record and verification never needs the
//! current configuration.

use crate::error::{LedgerError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Argon2id defaults recommended by the `argon2` crate (19 MiB, 2 passes).
pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ITERATIONS: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;

const SALT_LEN: usize = 16;

/// Cost parameters used when hashing new secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl HashingParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// Hashes and verifies secrets with a fixed set of Argon2id parameters.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
    params: HashingParams,
}

impl SecretHasher {
    pub fn new(params: HashingParams) -> Result<Self> {
        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| LedgerError::Config(format!("invalid argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            params,
        })
    }

    pub fn params(&self) -> HashingParams {
        self.params
    }

    /// Hashes `secret` under a fresh random salt and returns the PHC string.
    pub fn hash(&self, secret: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| LedgerError::Hashing(format!("failed to encode salt: {e}")))?;

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| LedgerError::Hashing(format!("failed to hash secret: {e}")))?;
        Ok(hash.to_string())
    }

    /// Checks `secret` against a stored PHC string.
    ///
    /// Parameters come from the stored hash. An unparseable hash is a
    /// mismatch, not an error, so callers cannot tell it apart from a wrong
    /// secret.
    pub fn verify(&self, stored: &str, secret: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored credential hash is malformed");
                false
            }
        }
    }

    /// Whether `stored` was produced with other costs than the current ones.
    ///
    /// A malformed hash never needs a rehash; it cannot be verified anyway.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        if parsed.algorithm.as_str() != Algorithm::Argon2id.as_str()
            || parsed.version != Some(Version::V0x13.into())
        {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored_params) => {
                HashingParams::new(
                    stored_params.m_cost(),
                    stored_params.t_cost(),
                    stored_params.p_cost(),
                ) != self.params
            }
            Err(_) => false,
        }
    }
}
