use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, SafeKeepError};

/// Which storage backend commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A single encrypted `.vault` file.
    #[default]
    File,
    /// The SQLite keyed store.
    Store,
}

/// Project-level configuration, loaded from `.safekeep.toml`.
///
/// Every field has a sensible default so SafeKeep works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file used when `--vault` is not given.
    #[serde(default = "default_vault")]
    pub default_vault: String,

    /// SQLite store used when the store backend is selected.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    #[serde(default)]
    pub backend: Backend,

    /// Name given to vaults created by `init` without `--name`.
    #[serde(default)]
    pub vault_name: Option<String>,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault() -> String {
    "passwords.vault".to_string()
}

fn default_store_path() -> String {
    "passwords.db".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vault: default_vault(),
            store_path: default_store_path(),
            backend: Backend::default(),
            vault_name: None,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".safekeep.toml";

    /// Load settings from `<project_dir>/.safekeep.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, or its Argon2 settings
    /// are out of range, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SafeKeepError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.argon2_params().validate().map_err(|e| {
            SafeKeepError::ConfigError(format!("{}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the default vault file relative to `project_dir`.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.default_vault)
    }

    /// Resolve the keyed store path relative to `project_dir`.
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_path)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
