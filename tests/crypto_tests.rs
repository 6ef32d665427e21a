//! Integration tests for the SafeKeep crypto module.

use safekeep::crypto::{
    decrypt, derive_credential, derive_key_with_params, encrypt, generate_salt, open, seal,
    unlock_key, verify_credential, Argon2Params,
};

/// Reduced cost so the suite stays fast.
const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

// ---------------------------------------------------------------------------
// Raw AES-256-GCM
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_with_raw_key() {
    let key = [7u8; 32];
    let ct = encrypt(&key, b"hunter2").unwrap();
    assert_ne!(&ct[..], b"hunter2");
    assert_eq!(decrypt(&key, &ct).unwrap(), b"hunter2");
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let key = [7u8; 32];
    let mut ct = encrypt(&key, b"hunter2").unwrap();
    let last = ct.len() - 1;
    ct[last] ^= 0x01;
    assert!(decrypt(&key, &ct).is_err());
}

// ---------------------------------------------------------------------------
// Password sealing
// ---------------------------------------------------------------------------

#[test]
fn seal_and_open_with_password() {
    let token = seal(r#"{"hello":"world"}"#, "master123", &FAST).unwrap();
    let plain = open(&token, "master123").unwrap();
    assert_eq!(plain.as_str(), r#"{"hello":"world"}"#);
}

#[test]
fn open_with_wrong_password_fails() {
    let token = seal("secret", "master123", &FAST).unwrap();
    assert!(open(&token, "wrong").is_err());
}

#[test]
fn every_seal_is_different() {
    let a = seal("same", "pw", &FAST).unwrap();
    let b = seal("same", "pw", &FAST).unwrap();
    assert_ne!(a, b, "fresh salt and nonce per seal");
}

#[test]
fn open_garbage_fails_cleanly() {
    assert!(open("", "pw").is_err());
    assert!(open("not base64 at all!", "pw").is_err());
    assert!(open("AAAA", "pw").is_err());
}

// ---------------------------------------------------------------------------
// Key derivation and credentials
// ---------------------------------------------------------------------------

#[test]
fn kdf_is_deterministic_per_salt() {
    let salt = generate_salt();
    let k1 = derive_key_with_params(b"pw", &salt, &FAST).unwrap();
    let k2 = derive_key_with_params(b"pw", &salt, &FAST).unwrap();
    let k3 = derive_key_with_params(b"pw", &generate_salt(), &FAST).unwrap();
    assert_eq!(k1, k2);
    assert_ne!(k1, k3);
}

#[test]
fn kdf_rejects_weak_params() {
    let weak = Argon2Params {
        memory_kib: 64,
        ..FAST
    };
    assert!(derive_key_with_params(b"pw", &generate_salt(), &weak).is_err());
}

#[test]
fn credential_verifies_only_its_password() {
    let cred = derive_credential("master123", &FAST).unwrap();
    assert!(verify_credential("master123", &cred));
    assert!(!verify_credential("master124", &cred));
    assert!(!verify_credential("", &cred));
}

#[test]
fn credential_without_params_uses_defaults() {
    // Records written before parameters were stored verify with defaults.
    let mut cred = derive_credential("pw-default", &Argon2Params::default()).unwrap();
    cred.params = None;
    assert!(verify_credential("pw-default", &cred));
}

#[test]
fn unlock_key_is_stable_for_the_same_credential() {
    let cred = derive_credential("master123", &FAST).unwrap();
    let a = unlock_key("master123", &cred).unwrap();
    let b = unlock_key("master123", &cred).unwrap();
    assert_eq!(a.field_key().unwrap(), b.field_key().unwrap());
    assert_ne!(a.field_key().unwrap(), a.credential_hash().unwrap());
}
