//! Master credential: the one-way record that lets us check a master
//! password without storing it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::kdf::{generate_salt, stretch_password, Argon2Params};
use super::keys::MasterKey;
use crate::errors::Result;

/// Salted, stretched hash of a master password.
///
/// `hash` and `salt` are base64 strings. `params` is absent in records
/// written before parameters were stored; defaults apply then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCredential {
    pub hash: String,
    pub salt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Argon2Params>,
}

impl MasterCredential {
    fn effective_params(&self) -> Argon2Params {
        self.params.unwrap_or_default()
    }
}

/// Build a new credential for `password` with a fresh random salt.
pub fn derive_credential(password: &str, params: &Argon2Params) -> Result<MasterCredential> {
    let salt = generate_salt();
    let master = MasterKey::new(stretch_password(password, &salt, params)?);
    let mut hash = master.credential_hash()?;

    let credential = MasterCredential {
        hash: BASE64.encode(hash),
        salt: BASE64.encode(salt),
        params: Some(*params),
    };
    hash.zeroize();

    Ok(credential)
}

/// Check `password` against a stored credential.
///
/// Never errors: a wrong password, an undecodable salt or hash, or
/// unusable stored parameters all yield `false`.
pub fn verify_credential(password: &str, credential: &MasterCredential) -> bool {
    unlock_key(password, credential).is_some()
}

/// Verify `password` and, on success, return the stretched master key.
pub fn unlock_key(password: &str, credential: &MasterCredential) -> Option<MasterKey> {
    let salt = BASE64.decode(&credential.salt).ok()?;
    let expected = BASE64.decode(&credential.hash).ok()?;

    let master = MasterKey::new(
        stretch_password(password, &salt, &credential.effective_params()).ok()?,
    );
    let mut actual = master.credential_hash().ok()?;

    let matches: bool = actual.as_slice().ct_eq(expected.as_slice()).into();
    actual.zeroize();

    matches.then_some(master)
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
    fn correct_password_verifies() {
        let cred = derive_credential("correct horse", &FAST).unwrap();
        assert!(verify_credential("correct horse", &cred));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let cred = derive_credential("correct horse", &FAST).unwrap();
        assert!(!verify_credential("battery staple", &cred));
    }

    #[test]
    fn salt_is_128_bits() {
        let cred = derive_credential("pw", &FAST).unwrap();
        assert_eq!(BASE64.decode(&cred.salt).unwrap().len(), 16);
    }

    #[test]
    fn same_password_gets_different_credentials() {
        let a = derive_credential("same", &FAST).unwrap();
        let b = derive_credential("same", &FAST).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn malformed_credential_returns_false() {
        let cred = MasterCredential {
            hash: "%%%".into(),
            salt: "%%%".into(),
            params: Some(FAST),
        };
        assert!(!verify_credential("anything", &cred));
    }

    #[test]
    fn unlock_key_matches_across_calls() {
        let cred = derive_credential("pw-123", &FAST).unwrap();
        let k1 = unlock_key("pw-123", &cred).unwrap();
        let k2 = unlock_key("pw-123", &cred).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert!(unlock_key("nope", &cred).is_none());
    }

    #[test]
    fn credential_json_roundtrip_keeps_params() {
        let cred = derive_credential("pw", &FAST).unwrap();
        let json = serde_json::to_string(&cred).unwrap();
        let back: MasterCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cred);
        assert!(verify_credential("pw", &back));
    }
}
