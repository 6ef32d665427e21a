//! Sub-key derivation with HKDF-SHA256.
//!
//! From the stretched master secret we derive:
//! - the **credential hash** stored for login verification, and
//! - the **field key** that encrypts individual passwords in the keyed
//!   store.
//!
//! Both come from the same Argon2id output under different `info`
//! labels, so the stored hash reveals nothing about the field key.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use super::kdf::KEY_LEN;
use crate::errors::{Result, SafeKeepError};

const CREDENTIAL_INFO: &[u8] = b"safekeep-credential-hash";
const FIELD_KEY_INFO: &[u8] = b"safekeep-password-field-key";

/// Derive the verification hash from a stretched master secret.
pub fn derive_credential_hash(master: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master, CREDENTIAL_INFO)
}

/// Derive the key used to encrypt stored password fields.
pub fn derive_field_key(master: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(master, FIELD_KEY_INFO)
}

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step is skipped because the input already came out of
/// Argon2id and has full entropy.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| SafeKeepError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master secret that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the verification hash for this key.
    pub fn credential_hash(&self) -> Result<[u8; KEY_LEN]> {
        derive_credential_hash(&self.bytes)
    }

    /// Derive the password-field key for this key.
    pub fn field_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_field_key(&self.bytes)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}
