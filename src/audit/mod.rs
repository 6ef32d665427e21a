//! Audit log: SQLite-based operation history.
//!
//! Stores a record of every vault operation (add, edit, delete, rotate,
//! etc.) in a local SQLite database next to the vault, at
//! `<vault_dir>/safekeep-audit.db`. Only entry ids are recorded, never
//! site names or passwords.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::cli::open::Target;
use crate::errors::{Result, SafeKeepError};

const DB_FILE: &str = "safekeep-audit.db";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub entry_id: Option<i64>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database in `dir`.
    ///
    /// Returns `None` if the database can't be opened: callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, path = %db_path.display(), "audit log unavailable");
                return None;
            }
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                vault       TEXT NOT NULL,
                entry_id    INTEGER,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget: errors are silently ignored.
    pub fn log(&self, operation: &str, vault: &str, entry_id: Option<i64>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, vault, entry_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, vault, entry_id, details],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // RFC 3339 strings in UTC sort chronologically, so a plain text
        // comparison is enough for the `since` filter.
        let since_str = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, vault, entry_id, details
                 FROM audit_log
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| SafeKeepError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    vault: row.get(3)?,
                    entry_id: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| SafeKeepError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| SafeKeepError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database in `dir`.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join(DB_FILE)
    }
}

/// Convenience helper: log an audit event for a vault target.
///
/// Opens the audit database, logs the event, and silently ignores any errors.
/// This is safe to call from any command: it never fails the parent operation.
pub fn log_audit(target: &Target, op: &str, entry_id: Option<i64>, details: Option<&str>) {
    if let Some(audit) = AuditLog::open(&target.dir()) {
        audit.log(op, &target.id(), entry_id, details);
    }
}
