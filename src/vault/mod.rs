//! Vault module: the encrypted document and its file format.
//!
//! This module provides:
//! - `VaultDocument`, `Entry` and `EntryDraft` (`document`)
//! - Encrypted `.vault` encoding, decoding and atomic writes (`codec`)
//! - Conversion of plain JSON entry lists into documents (`import`)

pub mod codec;
pub mod document;
pub mod import;

// Re-export the most commonly used items.
pub use codec::{
    create_empty, decode, encode, read_vault_file, read_vault_text, write_vault_file,
};
pub use document::{Entry, EntryDraft, VaultDocument, VaultMetadata};
