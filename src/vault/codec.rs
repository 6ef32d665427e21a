//! Encoding and decoding of `.vault` files.
//!
//! A `.vault` file is nothing but a cipher token (see `crypto::cipher`)
//! wrapping the JSON-serialized `VaultDocument`. There is no header or
//! magic outside the token.
//!
//! Decoding is a two-phase check: the cipher either yields plaintext or
//! fails, then the plaintext must parse as JSON with a `metadata` object
//! and an `entries` array. Every failure in either phase surfaces as the
//! same `InvalidVault` error.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use super::document::{VaultDocument, VaultMetadata, CURRENT_VERSION, DEFAULT_VAULT_NAME};
use crate::crypto::cipher;
use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, SafeKeepError};

/// Major version this build understands.
const SUPPORTED_MAJOR: u64 = 1;

/// Decrypt and validate the raw contents of a vault file.
pub fn decode(raw: &str, password: &str) -> Result<VaultDocument> {
    let plaintext = cipher::open(raw, password).map_err(|e| {
        debug!(error = %e, "vault token did not decrypt");
        SafeKeepError::InvalidVault
    })?;

    let value: Value = serde_json::from_str(&plaintext).map_err(|e| {
        debug!(error = %e, "decrypted vault is not JSON");
        SafeKeepError::InvalidVault
    })?;

    validate_structure(&value)?;

    let document: VaultDocument = serde_json::from_value(value).map_err(|e| {
        debug!(error = %e, "vault JSON does not match the document shape");
        SafeKeepError::InvalidVault
    })?;

    ensure_unique_ids(&document)?;
    check_version(&document.metadata.version)?;

    Ok(document)
}

/// Serialize and encrypt a document, returning the file contents.
pub fn encode(document: &VaultDocument, password: &str, params: &Argon2Params) -> Result<String> {
    let json = zeroize::Zeroizing::new(
        serde_json::to_string(document)
            .map_err(|e| SafeKeepError::SerializationError(format!("vault document: {e}")))?,
    );
    cipher::seal(&json, password, params)
}

/// A fresh, empty document.
pub fn create_empty(name: Option<&str>) -> VaultDocument {
    let now = Utc::now();
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_VAULT_NAME);

    VaultDocument {
        metadata: VaultMetadata {
            version: CURRENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            name: Some(name.to_string()),
        },
        entries: Vec::new(),
    }
}

/// Read and decode a vault file.
pub fn read_vault_file(path: &Path, password: &str) -> Result<VaultDocument> {
    let raw = read_vault_text(path)?;
    decode(&raw, password)
}

/// Read the raw token text of a vault file without decrypting it.
pub fn read_vault_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SafeKeepError::VaultNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| {
        // Binary garbage is "not a vault", not an I/O problem.
        if e.kind() == std::io::ErrorKind::InvalidData {
            SafeKeepError::InvalidVault
        } else {
            SafeKeepError::Io(e)
        }
    })
}

/// Encode a document and write it to disk **atomically**.
///
/// The token is written to a temp file in the same directory, then
/// renamed over the target so readers never see a half-written vault.
pub fn write_vault_file(
    path: &Path,
    document: &VaultDocument,
    password: &str,
    params: &Argon2Params,
) -> Result<()> {
    let token = encode(document, password, params)?;
    write_atomic(path, token.as_bytes())
}

/// Temp-file + rename write with owner-only permissions on Unix.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    // `mode` only applies on creation; a stale temp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `metadata` must be an object and `entries` an array.
fn validate_structure(value: &Value) -> Result<()> {
    let has_metadata = value.get("metadata").is_some_and(Value::is_object);
    let has_entries = value.get("entries").is_some_and(Value::is_array);

    if has_metadata && has_entries {
        Ok(())
    } else {
        debug!(has_metadata, has_entries, "vault JSON is missing required fields");
        Err(SafeKeepError::InvalidVault)
    }
}

fn ensure_unique_ids(document: &VaultDocument) -> Result<()> {
    let mut seen = HashSet::new();
    for id in document.entries.iter().filter_map(|e| e.id) {
        if !seen.insert(id) {
            debug!(id, "vault contains a duplicate entry id");
            return Err(SafeKeepError::InvalidVault);
        }
    }
    Ok(())
}

/// Accept any `1.x.y` version; minor and patch bumps are additive.
pub(crate) fn check_version(version: &str) -> Result<()> {
    let major = version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()
        .and_then(|m| m.parse::<u64>().ok());

    match major {
        Some(SUPPORTED_MAJOR) => Ok(()),
        _ => Err(SafeKeepError::UnsupportedVersion(version.to_string())),
    }
}
