//! OS keyring integration for master password caching.
//!
//! Stores and retrieves the master password of a vault from the operating
//! system's secure credential store (Keychain, Credential Manager, Secret
//! Service). Entries are keyed by the vault path, so each vault file and
//! each keyed store gets its own slot.
//!
//! Every call fails softly: callers fall back to a password prompt.

use crate::errors::{Result, SafeKeepError};

/// Service name used in the OS keyring.
const SERVICE_NAME: &str = "safekeep";

fn entry(vault_id: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(SERVICE_NAME, &format!("vault:{vault_id}"))
        .map_err(|e| SafeKeepError::KeyringError(format!("failed to create keyring entry: {e}")))
}

/// Remember `password` for the vault identified by `vault_id`.
pub fn store_password(vault_id: &str, password: &str) -> Result<()> {
    entry(vault_id)?.set_password(password).map_err(|e| {
        SafeKeepError::KeyringError(format!("failed to store password in keyring: {e}"))
    })
}

/// The remembered password, or `None` when nothing is stored.
pub fn get_password(vault_id: &str) -> Result<Option<String>> {
    match entry(vault_id)?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(SafeKeepError::KeyringError(format!(
            "failed to read from keyring: {e}"
        ))),
    }
}

/// Forget the remembered password. Missing entries are not an error.
pub fn delete_password(vault_id: &str) -> Result<()> {
    match entry(vault_id)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(SafeKeepError::KeyringError(format!(
            "failed to delete from keyring: {e}"
        ))),
    }
}
