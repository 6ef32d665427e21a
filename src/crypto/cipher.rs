//! Password-based encryption of whole documents.
//!
//! The master password itself is the secret: every `seal` picks a fresh
//! salt, stretches the password with Argon2id and encrypts with
//! AES-256-GCM. Everything `open` needs besides the password travels
//! inside the token, which is base64 text:
//!
//! ```text
//! [format: 1][memory_kib: 4 LE][iterations: 4 LE][parallelism: 4 LE][salt: 16][nonce: 12][ciphertext + tag]
//! ```
//!
//! `open` fails when the tag does not verify. Callers above this layer
//! must not try to tell a wrong password from a damaged token.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use super::encryption::{self, NONCE_LEN};
use super::kdf::{derive_key_with_params, generate_salt, Argon2Params, SALT_LEN};
use crate::errors::{Result, SafeKeepError};

/// Current token format.
const TOKEN_FORMAT: u8 = 1;

/// format byte + three little-endian u32 parameters + salt.
const PREFIX_LEN: usize = 1 + 12 + SALT_LEN;

/// Encrypt `plaintext` under `password`, returning an opaque text token.
pub fn seal(plaintext: &str, password: &str, params: &Argon2Params) -> Result<String> {
    let salt = generate_salt();

    let mut key = derive_key_with_params(password.as_bytes(), &salt, params)?;
    let sealed = encryption::encrypt(&key, plaintext.as_bytes());
    key.zeroize();
    let sealed = sealed?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + sealed.len());
    buf.push(TOKEN_FORMAT);
    buf.extend_from_slice(&params.memory_kib.to_le_bytes());
    buf.extend_from_slice(&params.iterations.to_le_bytes());
    buf.extend_from_slice(&params.parallelism.to_le_bytes());
    buf.extend_from_slice(&salt);
    buf.extend_from_slice(&sealed);

    Ok(BASE64.encode(buf))
}

/// Decrypt a token produced by `seal`.
///
/// Any failure (bad base64, unknown format, unusable parameters, auth
/// tag mismatch, non-UTF-8 plaintext) is `DecryptionFailed`.
pub fn open(token: &str, password: &str) -> Result<Zeroizing<String>> {
    let raw = BASE64
        .decode(token.trim())
        .map_err(|_| SafeKeepError::DecryptionFailed)?;

    if raw.len() < PREFIX_LEN + NONCE_LEN || raw[0] != TOKEN_FORMAT {
        return Err(SafeKeepError::DecryptionFailed);
    }

    let params = Argon2Params {
        memory_kib: read_u32(&raw[1..5])?,
        iterations: read_u32(&raw[5..9])?,
        parallelism: read_u32(&raw[9..13])?,
    };
    let salt = &raw[13..PREFIX_LEN];

    let mut key = derive_key_with_params(password.as_bytes(), salt, &params)
        .map_err(|_| SafeKeepError::DecryptionFailed)?;
    let plaintext = encryption::decrypt(&key, &raw[PREFIX_LEN..]);
    key.zeroize();

    String::from_utf8(plaintext?)
        .map(Zeroizing::new)
        .map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            SafeKeepError::DecryptionFailed
        })
}

fn read_u32(bytes: &[u8]) -> Result<u32> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| SafeKeepError::DecryptionFailed)?;
    Ok(u32::from_le_bytes(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn seal_open_roundtrip() {
        let token = seal("{\"hello\":1}", "master123", &FAST).unwrap();
        assert_eq!(open(&token, "master123").unwrap().as_str(), "{\"hello\":1}");
    }

    #[test]
    fn tokens_are_salted() {
        let a = seal("same", "pw", &FAST).unwrap();
        let b = seal("same", "pw", &FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_password_fails() {
        let token = seal("data", "right", &FAST).unwrap();
        assert!(matches!(
            open(&token, "wrong"),
            Err(SafeKeepError::DecryptionFailed)
        ));
    }

    #[test]
    fn empty_and_garbage_tokens_fail() {
        assert!(open("", "pw").is_err());
        assert!(open("aGVsbG8=", "pw").is_err());
        assert!(open("this is not base64", "pw").is_err());
    }

    #[test]
    fn unknown_format_byte_fails() {
        let token = seal("data", "pw", &FAST).unwrap();
        let mut raw = BASE64.decode(&token).unwrap();
        raw[0] = 9;
        assert!(open(&BASE64.encode(raw), "pw").is_err());
    }

    #[test]
    fn tampered_params_fail_instead_of_allocating() {
        let token = seal("data", "pw", &FAST).unwrap();
        let mut raw = BASE64.decode(&token).unwrap();
        raw[1..5].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(open(&BASE64.encode(raw), "pw").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let token = seal("data", "pw", &FAST).unwrap();
        let padded = format!("\n{token}\n");
        assert_eq!(open(&padded, "pw").unwrap().as_str(), "data");
    }
}
