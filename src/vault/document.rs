//! The decrypted vault document and the entries it holds.
//!
//! Field names match the JSON layout of `.vault` files: metadata uses
//! camelCase (`createdAt`), entries use snake_case (`site_name`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::errors::{Result, SafeKeepError};

/// Version written into every new document.
pub const CURRENT_VERSION: &str = "1.0.0";

/// Name given to `create_empty` vaults when none is provided.
pub const DEFAULT_VAULT_NAME: &str = "My Password Vault";

/// Shown for documents that carry no name at all.
const UNNAMED_VAULT: &str = "Unnamed Vault";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetadata {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The full plaintext contents of a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDocument {
    pub metadata: VaultMetadata,
    pub entries: Vec<Entry>,
}

impl VaultDocument {
    /// Name to show for this vault.
    pub fn display_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or(UNNAMED_VAULT)
    }

    /// Give every entry without an id the next free one, in document
    /// order. Returns how many entries were numbered.
    pub fn number_unassigned_entries(&mut self) -> usize {
        let mut next_id = self.entries.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
        let mut numbered = 0;
        for entry in self.entries.iter_mut().filter(|e| e.id.is_none()) {
            entry.id = Some(next_id);
            next_id += 1;
            numbered += 1;
        }
        numbered
    }

    /// Overwrite every plaintext password held by this document.
    pub fn wipe(&mut self) {
        for entry in &mut self.entries {
            entry.password.zeroize();
        }
        self.entries.clear();
    }
}

/// One stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within a document; absent only for entries that were
    /// never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entry {
    /// Build a brand-new entry from a draft with both timestamps set to `now`.
    pub fn from_draft(id: Option<i64>, draft: EntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            site_name: draft.site_name,
            site_url: draft.site_url,
            username: draft.username,
            password: draft.password,
            created_at: now,
            modified_at: now,
            notes: draft.notes,
        }
    }

    /// Replace every mutable field with the draft's and bump `modified_at`.
    pub fn apply(&mut self, draft: EntryDraft) {
        self.password.zeroize();
        self.site_name = draft.site_name;
        self.site_url = draft.site_url;
        self.username = draft.username;
        self.password = draft.password;
        self.notes = draft.notes;
        self.modified_at = next_modified_at(self.modified_at);
    }

    /// The caller-editable fields of this entry.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            site_name: self.site_name.clone(),
            site_url: self.site_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Case-insensitive substring match over the searchable fields.
    ///
    /// `needle` must already be lowercased. Missing optional fields count
    /// as empty strings.
    pub fn matches(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);

        contains(self.site_name.as_str())
            || self.site_url.as_deref().is_some_and(contains)
            || self.username.as_deref().is_some_and(contains)
            || self.notes.as_deref().is_some_and(contains)
    }
}

/// The caller-supplied fields of an entry, used for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub site_name: String,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EntryDraft {
    /// Convenience constructor for the two required fields.
    pub fn new(site_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Reject drafts with a blank site name or password.
    pub fn validate(&self) -> Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(SafeKeepError::Validation("site name is required".into()));
        }
        if self.password.trim().is_empty() {
            return Err(SafeKeepError::Validation("password is required".into()));
        }
        Ok(())
    }

    /// Turn empty optional strings into `None`.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        self.site_url = blank_to_none(self.site_url);
        self.username = blank_to_none(self.username);
        self.notes = blank_to_none(self.notes);
        self
    }
}

/// A modification timestamp that is strictly after `previous`, even if
/// the clock has not advanced since.
pub fn next_modified_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(site: &str) -> Entry {
        Entry::from_draft(Some(1), EntryDraft::new(site, "pw"), Utc::now())
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        assert!(EntryDraft::new("", "pw").validate().is_err());
        assert!(EntryDraft::new("   ", "pw").validate().is_err());
        assert!(EntryDraft::new("Site", "").validate().is_err());
        assert!(EntryDraft::new("Site", "pw").validate().is_ok());
    }

    #[test]
    fn matches_is_case_insensitive() {
        let e = entry("GitHub");
        assert!(e.matches("git"));
        assert!(e.matches("hub"));
        assert!(!e.matches("gitlab"));
    }

    #[test]
    fn missing_optional_fields_never_match() {
        let e = entry("Example");
        assert!(!e.matches("https"));
        assert!(!e.matches("note"));
    }

    #[test]
    fn apply_bumps_modified_at_strictly() {
        let mut e = entry("Example");
        let before = e.modified_at;
        e.apply(EntryDraft::new("Example", "new"));
        assert!(e.modified_at > before);
        assert_eq!(e.password, "new");
        assert_eq!(e.created_at, before);
    }

    #[test]
    fn next_modified_at_handles_future_previous() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_modified_at(future) > future);
    }

    #[test]
    fn normalized_drops_blank_optionals() {
        let d = EntryDraft::new("S", "p").with_url("").with_notes("  ").normalized();
        assert!(d.site_url.is_none());
        assert!(d.notes.is_none());
    }

    #[test]
    fn entry_json_uses_snake_case_and_omits_missing_fields() {
        let e = entry("Example");
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("site_name").is_some());
        assert!(json.get("site_url").is_none());
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn unassigned_entries_are_numbered_after_the_largest_id() {
        let now = Utc::now();
        let mut doc = VaultDocument {
            metadata: VaultMetadata {
                version: CURRENT_VERSION.into(),
                created_at: now,
                updated_at: now,
                name: None,
            },
            entries: vec![
                Entry::from_draft(None, EntryDraft::new("A", "a"), now),
                Entry::from_draft(Some(4), EntryDraft::new("B", "b"), now),
                Entry::from_draft(None, EntryDraft::new("C", "c"), now),
            ],
        };

        assert_eq!(doc.number_unassigned_entries(), 2);
        let ids: Vec<_> = doc.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(5), Some(4), Some(6)]);
        assert_eq!(doc.number_unassigned_entries(), 0);
    }

    #[test]
    fn wipe_clears_entries() {
        let now = Utc::now();
        let mut doc = VaultDocument {
            metadata: VaultMetadata {
                version: CURRENT_VERSION.into(),
                created_at: now,
                updated_at: now,
                name: None,
            },
            entries: vec![entry("A")],
        };
        assert_eq!(doc.display_name(), "Unnamed Vault");
        doc.wipe();
        assert!(doc.entries.is_empty());
    }
}
