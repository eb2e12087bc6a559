//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`, all fields optional:
//! ```json
//! {
//!   "backend": "file",
//!   "hashing": { "memoryKib": 19456, "iterations": 2, "parallelism": 1 }
//! }
//! ```
//! `POCKETBANK_BACKEND` overrides the file; command-line flags override both.

use crate::domain::credential::HashingParams;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SETTINGS_FILE: &str = "settings.json";
pub const BACKEND_ENV: &str = "POCKETBANK_BACKEND";

/// Which `AccountStore` implementation backs the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON snapshot replaced atomically on every commit.
    #[default]
    File,
    /// RocksDB, when built with the `storage-rocksdb` feature.
    Rocksdb,
}

impl FromStr for Backend {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "rocksdb" => Ok(Self::Rocksdb),
            other => Err(LedgerError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    backend: Option<Backend>,
    #[serde(default)]
    hashing: Option<HashingParams>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub hashing: HashingParams,
}

impl Config {
    /// Defaults for `data_dir` without reading anything from disk.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: Backend::default(),
            hashing: HashingParams::default(),
        }
    }

    /// Load config from the data directory, then apply environment overrides.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let settings: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path).map_err(|e| {
                LedgerError::Config(format!("cannot read {}: {e}", settings_path.display()))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                LedgerError::Config(format!("cannot parse {}: {e}", settings_path.display()))
            })?
        } else {
            SettingsFile::default()
        };

        Self::resolve(data_dir, settings, std::env::var(BACKEND_ENV).ok().as_deref())
    }

    fn resolve(data_dir: &Path, settings: SettingsFile, backend_env: Option<&str>) -> Result<Self> {
        let backend = match backend_env {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => settings.backend.unwrap_or_default(),
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            backend,
            hashing: settings.hashing.unwrap_or_default(),
        })
    }
}
