//! Cryptographic primitives for SafeKeep.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption with a raw key (`encryption`)
//! - Password-based sealing of whole documents (`cipher`)
//! - Argon2id password stretching (`kdf`)
//! - HKDF sub-keys and the zeroizing `MasterKey` (`keys`)
//! - Master credential derivation and verification (`credential`)
//! - Random entry passwords (`generator`)

pub mod cipher;
pub mod credential;
pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_credential, ...};
pub use cipher::{open, seal};
pub use credential::{derive_credential, unlock_key, verify_credential, MasterCredential};
pub use encryption::{decrypt, decrypt_field, encrypt, encrypt_field};
pub use generator::generate_password;
pub use kdf::{derive_key_with_params, generate_salt, Argon2Params};
pub use keys::MasterKey;
