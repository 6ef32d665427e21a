//! `EntryStore` over the entries of an unlocked vault document.

use chrono::Utc;
use zeroize::Zeroize;

use super::EntryStore;
use crate::errors::Result;
use crate::vault::{Entry, EntryDraft};

/// In-memory store borrowing a document's entry list.
///
/// Entries keep insertion order. New ids are one past the largest id
/// currently present, so ids are never reused while the entry holding
/// the largest one survives.
pub struct DocumentStore<'a> {
    entries: &'a mut Vec<Entry>,
}

impl<'a> DocumentStore<'a> {
    pub fn new(entries: &'a mut Vec<Entry>) -> Self {
        Self { entries }
    }

    fn next_id(&self) -> i64 {
        self.entries.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == Some(id))
    }
}

impl EntryStore for DocumentStore<'_> {
    fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }

    fn get(&self, id: i64) -> Result<Option<Entry>> {
        Ok(self.entries.iter().find(|e| e.id == Some(id)).cloned())
    }

    fn create(&mut self, draft: EntryDraft) -> Result<i64> {
        draft.validate()?;
        let id = self.next_id();
        self.entries
            .push(Entry::from_draft(Some(id), draft.normalized(), Utc::now()));
        Ok(id)
    }

    fn update(&mut self, id: i64, draft: EntryDraft) -> Result<bool> {
        draft.validate()?;
        match self.position(id) {
            Some(index) => {
                self.entries[index].apply(draft.normalized());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: i64) -> Result<bool> {
        match self.position(id) {
            Some(index) => {
                let mut removed = self.entries.remove(index);
                removed.password.zeroize();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
