//! AES-256-GCM authenticated encryption with a raw 32-byte key.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! The `*_field` helpers wrap the same layout in base64 so a single
//! column value (e.g. `password_encrypted`) can be stored as text.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, SafeKeepError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SafeKeepError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| SafeKeepError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Fails with `DecryptionFailed` if the data is truncated or the auth
/// tag does not verify under `key`.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(SafeKeepError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SafeKeepError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SafeKeepError::DecryptionFailed)
}

/// Encrypt a text field and return it as base64 (nonce || ciphertext).
pub fn encrypt_field(key: &[u8], plaintext: &str) -> Result<String> {
    let sealed = encrypt(key, plaintext.as_bytes())?;
    Ok(BASE64.encode(sealed))
}

/// Reverse of `encrypt_field`.
pub fn decrypt_field(key: &[u8], encoded: &str) -> Result<Zeroizing<String>> {
    let sealed = BASE64
        .decode(encoded.trim())
        .map_err(|_| SafeKeepError::DecryptionFailed)?;
    let plaintext = decrypt(key, &sealed)?;

    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            SafeKeepError::DecryptionFailed
        })
}
