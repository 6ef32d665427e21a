//! Entry storage: CRUD and search over credential entries.
//!
//! Two backends implement the same `EntryStore` trait:
//! - `DocumentStore` works on the entries of an unlocked `VaultDocument`
//!   (plaintext in memory, the whole document is encrypted on save).
//! - `KeyedStore` works on a SQLite database where every password is
//!   encrypted individually before it is written.

pub mod document;
pub mod keyed;

pub use document::DocumentStore;
pub use keyed::{KeyedDatabase, KeyedStore};

use crate::errors::Result;
use crate::vault::{Entry, EntryDraft};

/// Abstraction over entry storage operations.
///
/// `update` and `delete` report a missing id with `Ok(false)`; errors
/// are reserved for validation and storage failures.
pub trait EntryStore {
    /// All entries, in the backend's documented order.
    fn list(&self) -> Result<Vec<Entry>>;

    /// A single entry by id.
    fn get(&self, id: i64) -> Result<Option<Entry>>;

    /// Validate and store a new entry. Returns the assigned id.
    fn create(&mut self, draft: EntryDraft) -> Result<i64>;

    /// Replace the mutable fields of entry `id`.
    fn update(&mut self, id: i64, draft: EntryDraft) -> Result<bool>;

    /// Remove entry `id`. Returns true if it existed.
    fn delete(&mut self, id: i64) -> Result<bool>;

    /// Case-insensitive search over site name, URL, username and notes.
    fn search(&self, query: &str) -> Result<Vec<Entry>> {
        Ok(search_entries(self.list()?, query))
    }
}

/// Filter `entries` down to those matching `query`, preserving order.
///
/// An empty or whitespace-only query returns everything unchanged.
pub fn search_entries(entries: Vec<Entry>, query: &str) -> Vec<Entry> {
    let query = query.trim();
    if query.is_empty() {
        return entries;
    }

    let needle = query.to_lowercase();
    entries.into_iter().filter(|e| e.matches(&needle)).collect()
}
