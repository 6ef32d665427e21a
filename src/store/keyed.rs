//! SQLite-backed entry store.
//!
//! Two tables:
//! - `settings` holds exactly one master credential (JSON) under the
//!   key `masterKey`.
//! - `passwords` holds entries with the password stored only as
//!   ciphertext (`password_encrypted`), keyed by an autoincrement id and
//!   indexed (non-unique) on `site_name`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use super::EntryStore;
use crate::crypto::encryption::{decrypt_field, encrypt_field};
use crate::crypto::kdf::KEY_LEN;
use crate::crypto::{MasterCredential, MasterKey};
use crate::errors::{Result, SafeKeepError};
use crate::vault::document::next_modified_at;
use crate::vault::{Entry, EntryDraft};

/// Settings key under which the master credential is stored.
const MASTER_KEY_SETTING: &str = "masterKey";

const SELECT_COLUMNS: &str = "SELECT id, site_name, site_url, username, password_encrypted,
                                     created_at, modified_at, notes
                              FROM passwords";

/// Wrapper around the SQLite connection holding the keyed store.
pub struct KeyedDatabase {
    conn: Connection,
}

impl KeyedDatabase {
    /// Open (or create) the store at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS passwords (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                site_name           TEXT NOT NULL,
                site_url            TEXT,
                username            TEXT,
                password_encrypted  TEXT NOT NULL,
                created_at          TEXT NOT NULL,
                modified_at         TEXT NOT NULL,
                notes               TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_passwords_site_name
                ON passwords(site_name);
            ",
        )?;

        debug!("keyed store migrations completed");
        Ok(())
    }

    /// Whether a master credential has been stored.
    pub fn master_exists(&self) -> Result<bool> {
        Ok(self.load_credential()?.is_some())
    }

    /// The stored master credential, if any.
    pub fn load_credential(&self) -> Result<Option<MasterCredential>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![MASTER_KEY_SETTING],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| SafeKeepError::Storage(format!("corrupt master credential: {e}")))
        })
        .transpose()
    }

    /// Insert or replace the master credential.
    pub fn save_credential(&self, credential: &MasterCredential) -> Result<()> {
        let json = serde_json::to_string(credential)
            .map_err(|e| SafeKeepError::SerializationError(format!("credential: {e}")))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![MASTER_KEY_SETTING, json],
        )?;
        Ok(())
    }

    /// Re-encrypt every stored password under `new_key` and replace the
    /// credential, all in one transaction.
    ///
    /// Returns the number of re-encrypted entries.
    pub fn rekey(
        &mut self,
        old_key: &MasterKey,
        new_key: &MasterKey,
        new_credential: &MasterCredential,
    ) -> Result<usize> {
        let old_field = Zeroizing::new(old_key.field_key()?);
        let new_field = Zeroizing::new(new_key.field_key()?);
        let credential_json = serde_json::to_string(new_credential)
            .map_err(|e| SafeKeepError::SerializationError(format!("credential: {e}")))?;

        let tx = self.conn.transaction()?;

        let rows: Vec<(i64, String)> = {
            let mut stmt = tx.prepare("SELECT id, password_encrypted FROM passwords")?;
            let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            mapped.collect::<rusqlite::Result<_>>()?
        };

        for (id, sealed) in &rows {
            let plaintext = decrypt_field(old_field.as_ref(), sealed)?;
            let resealed = encrypt_field(new_field.as_ref(), &plaintext)?;
            tx.execute(
                "UPDATE passwords SET password_encrypted = ?1 WHERE id = ?2",
                params![resealed, id],
            )?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![MASTER_KEY_SETTING, credential_json],
        )?;
        tx.commit()?;

        Ok(rows.len())
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// A row as stored, before the password is decrypted.
struct StoredRow {
    id: i64,
    site_name: String,
    site_url: Option<String>,
    username: Option<String>,
    password_encrypted: String,
    created_at: String,
    modified_at: String,
    notes: Option<String>,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            site_name: row.get(1)?,
            site_url: row.get(2)?,
            username: row.get(3)?,
            password_encrypted: row.get(4)?,
            created_at: row.get(5)?,
            modified_at: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}

/// `EntryStore` over a `KeyedDatabase`, bound to an unlocked key.
///
/// Entries are listed by `site_name` (case-insensitive), then id.
pub struct KeyedStore<'a> {
    db: &'a KeyedDatabase,
    field_key: Zeroizing<[u8; KEY_LEN]>,
}

impl<'a> KeyedStore<'a> {
    pub fn new(db: &'a KeyedDatabase, key: &MasterKey) -> Result<Self> {
        Ok(Self {
            db,
            field_key: Zeroizing::new(key.field_key()?),
        })
    }

    fn to_entry(&self, row: StoredRow) -> Result<Entry> {
        let password = decrypt_field(self.field_key.as_ref(), &row.password_encrypted)?;
        Ok(Entry {
            id: Some(row.id),
            site_name: row.site_name,
            site_url: row.site_url,
            username: row.username,
            password: password.as_str().to_owned(),
            created_at: parse_timestamp(&row.created_at)?,
            modified_at: parse_timestamp(&row.modified_at)?,
            notes: row.notes,
        })
    }

    fn modified_at_of(&self, id: i64) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT modified_at FROM passwords WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        raw.as_deref().map(parse_timestamp).transpose()
    }
}

impl EntryStore for KeyedStore<'_> {
    fn list(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.db.conn().prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY site_name COLLATE NOCASE, id"
        ))?;
        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(|row| self.to_entry(row)).collect()
    }

    fn get(&self, id: i64) -> Result<Option<Entry>> {
        let row = self
            .db
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                StoredRow::from_row,
            )
            .optional()?;

        row.map(|r| self.to_entry(r)).transpose()
    }

    fn create(&mut self, draft: EntryDraft) -> Result<i64> {
        draft.validate()?;
        let mut draft = draft.normalized();
        let sealed = encrypt_field(self.field_key.as_ref(), &draft.password)?;
        draft.password.zeroize();
        let now = Utc::now().to_rfc3339();

        self.db.conn().execute(
            "INSERT INTO passwords
                (site_name, site_url, username, password_encrypted, created_at, modified_at, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)",
            params![
                draft.site_name,
                draft.site_url,
                draft.username,
                sealed,
                now,
                draft.notes
            ],
        )?;

        let id = self.db.conn().last_insert_rowid();
        debug!(id, "entry created in keyed store");
        Ok(id)
    }

    fn update(&mut self, id: i64, draft: EntryDraft) -> Result<bool> {
        draft.validate()?;
        let Some(previous) = self.modified_at_of(id)? else {
            return Ok(false);
        };

        let mut draft = draft.normalized();
        let sealed = encrypt_field(self.field_key.as_ref(), &draft.password)?;
        draft.password.zeroize();
        let modified_at = next_modified_at(previous).to_rfc3339();

        let changed = self.db.conn().execute(
            "UPDATE passwords
             SET site_name = ?1, site_url = ?2, username = ?3,
                 password_encrypted = ?4, modified_at = ?5, notes = ?6
             WHERE id = ?7",
            params![
                draft.site_name,
                draft.site_url,
                draft.username,
                sealed,
                modified_at,
                draft.notes,
                id
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM passwords WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SafeKeepError::Storage(format!("bad timestamp '{raw}': {e}")))
}
