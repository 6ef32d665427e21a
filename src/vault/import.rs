//! Conversion of plain JSON entry lists into vault documents.
//!
//! Accepted inputs:
//! - a bare array of entries,
//! - an object with an `entries` array (and no `metadata`),
//! - a complete document with `metadata` and `entries`.
//!
//! The first two are wrapped into a new document. Entries may omit
//! `id`, timestamps and every optional field.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::codec::check_version;
use super::document::{Entry, EntryDraft, VaultDocument, VaultMetadata, CURRENT_VERSION};
use crate::errors::{Result, SafeKeepError};

/// Name given to documents built from a bare entry list.
pub const GENERATED_VAULT_NAME: &str = "Generated Vault";

/// Entry shape as it may appear in a hand-written import file.
#[derive(Debug, Deserialize)]
struct ImportedEntry {
    id: Option<i64>,
    #[serde(default)]
    site_name: String,
    site_url: Option<String>,
    username: Option<String>,
    #[serde(default)]
    password: String,
    created_at: Option<DateTime<Utc>>,
    modified_at: Option<DateTime<Utc>>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedMetadata {
    version: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    name: Option<String>,
}

/// Parse import JSON into a document.
///
/// `name` overrides the vault name for wrapped inputs; full documents
/// keep their own metadata.
pub fn document_from_json(json: &str, name: Option<&str>) -> Result<VaultDocument> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SafeKeepError::InvalidImport(format!("invalid JSON: {e}")))?;

    let now = Utc::now();

    let (metadata, raw_entries) = match value {
        Value::Array(items) => (wrapped_metadata(name, now), items),
        Value::Object(mut map) => {
            let entries = match map.remove("entries") {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(SafeKeepError::InvalidImport(
                        "`entries` must be an array".into(),
                    ))
                }
                None => {
                    return Err(SafeKeepError::InvalidImport(
                        "expected an array of entries or an object with `entries`".into(),
                    ))
                }
            };
            let metadata = match map.remove("metadata") {
                Some(meta) => {
                    let meta: ImportedMetadata = serde_json::from_value(meta).map_err(|e| {
                        SafeKeepError::InvalidImport(format!("invalid metadata: {e}"))
                    })?;
                    let version = meta.version.unwrap_or_else(|| CURRENT_VERSION.to_string());
                    // The written vault must open again with this build.
                    check_version(&version).map_err(|_| {
                        SafeKeepError::InvalidImport(format!("unsupported version '{version}'"))
                    })?;
                    VaultMetadata {
                        version,
                        created_at: meta.created_at.unwrap_or(now),
                        updated_at: meta.updated_at.unwrap_or(now),
                        name: meta.name,
                    }
                }
                None => wrapped_metadata(name, now),
            };
            (metadata, entries)
        }
        _ => {
            return Err(SafeKeepError::InvalidImport(
                "expected an array of entries or an object with `entries`".into(),
            ))
        }
    };

    let mut imported = Vec::with_capacity(raw_entries.len());
    for (index, raw) in raw_entries.into_iter().enumerate() {
        let entry: ImportedEntry = serde_json::from_value(raw).map_err(|e| {
            SafeKeepError::InvalidImport(format!("entry #{}: {e}", index + 1))
        })?;
        imported.push(entry);
    }

    let entries = assign_entries(imported, now)?;

    Ok(VaultDocument { metadata, entries })
}

/// Where `generate` writes its output: `<dir>/<stem>.vault`.
pub fn sibling_vault_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vault".to_string());
    input.with_file_name(format!("{stem}.vault"))
}

fn wrapped_metadata(name: Option<&str>, now: DateTime<Utc>) -> VaultMetadata {
    VaultMetadata {
        version: CURRENT_VERSION.to_string(),
        created_at: now,
        updated_at: now,
        name: Some(name.unwrap_or(GENERATED_VAULT_NAME).to_string()),
    }
}

/// Validate every entry and fill in missing ids and timestamps.
///
/// Explicit ids are kept (and must be unique); missing ones are numbered
/// after the largest explicit id.
fn assign_entries(imported: Vec<ImportedEntry>, now: DateTime<Utc>) -> Result<Vec<Entry>> {
    let mut next_id = imported.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::with_capacity(imported.len());

    for (index, item) in imported.into_iter().enumerate() {
        let draft = EntryDraft {
            site_name: item.site_name,
            site_url: item.site_url,
            username: item.username,
            password: item.password,
            notes: item.notes,
        };
        draft.validate().map_err(|e| {
            SafeKeepError::InvalidImport(format!("entry #{}: {e}", index + 1))
        })?;

        let id = match item.id {
            Some(id) => id,
            None => {
                let id = next_id;
                next_id += 1;
                id
            }
        };
        if !seen.insert(id) {
            return Err(SafeKeepError::InvalidImport(format!(
                "entry #{}: duplicate id {id}",
                index + 1
            )));
        }

        let created_at = item.created_at.unwrap_or(now);
        let mut entry = Entry::from_draft(Some(id), draft, created_at);
        entry.modified_at = item.modified_at.unwrap_or(now);
        entries.push(entry);
    }

    Ok(entries)
}
