use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in SafeKeep.
#[derive(Debug, Error)]
pub enum SafeKeepError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Session errors ---
    #[error("Incorrect master password")]
    InvalidCredential,

    #[error("Vault is locked — unlock it with the master password first")]
    SessionLocked,

    #[error("Vault is already unlocked — lock it before unlocking again")]
    AlreadyUnlocked,

    #[error("A master password is already set for this store")]
    MasterAlreadyInitialized,

    #[error("No master password set — run `safekeep init` first")]
    MasterNotInitialized,

    // --- Vault errors ---
    /// Wrong password, undecryptable data and structurally invalid JSON
    /// all end up here; the cause is only logged at debug level.
    #[error("Invalid vault file or incorrect master password")]
    InvalidVault,

    #[error("Unsupported vault version '{0}'")]
    UnsupportedVersion(String),

    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    // --- Entry errors ---
    #[error("{0}")]
    Validation(String),

    #[error("Entry #{0} not found")]
    EntryNotFound(i64),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    // --- Keyring errors ---
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl From<rusqlite::Error> for SafeKeepError {
    fn from(e: rusqlite::Error) -> Self {
        SafeKeepError::Storage(e.to_string())
    }
}

/// Convenience type alias for SafeKeep results.
pub type Result<T> = std::result::Result<T, SafeKeepError>;
