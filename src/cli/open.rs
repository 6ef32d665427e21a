//! Resolving which vault a command works on, and unlocking it.

use std::path::{Path, PathBuf};

use crate::cli::{prompt_password_for_vault, Cli};
use crate::config::{Backend, Settings};
use crate::errors::{Result, SafeKeepError};
use crate::session::{FileSession, KeyedSession};
use crate::store::{EntryStore, KeyedDatabase};
use crate::vault::{codec, VaultDocument};

/// The vault location selected by flags and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Store(PathBuf),
}

impl Target {
    /// `--store` wins, then `--vault`, then the configured backend.
    pub fn resolve(cli: &Cli, settings: &Settings, project_dir: &Path) -> Self {
        if let Some(store) = &cli.store {
            return Target::Store(project_dir.join(store));
        }
        if let Some(vault) = &cli.vault {
            return Target::File(project_dir.join(vault));
        }
        match settings.backend {
            Backend::File => Target::File(settings.vault_path(project_dir)),
            Backend::Store => Target::Store(settings.store_path(project_dir)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Target::File(p) | Target::Store(p) => p,
        }
    }

    /// Identifier used for keyring entries and audit records.
    pub fn id(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }

    /// Directory holding the vault; the audit database lives here too.
    pub fn dir(&self) -> PathBuf {
        match self.path().parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Settings and target for one CLI invocation.
pub struct Context {
    pub settings: Settings,
    pub target: Target,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let settings = Settings::load(&cwd)?;
        let target = Target::resolve(cli, &settings, &cwd);
        Ok(Self { settings, target })
    }

    /// Log an audit event for this target. Never fails.
    pub fn audit(&self, op: &str, entry_id: Option<i64>, details: Option<&str>) {
        crate::audit::log_audit(&self.target, op, entry_id, details);
    }
}

/// An unlocked session over either backend.
pub enum OpenVault {
    File { path: PathBuf, session: FileSession },
    Keyed(KeyedSession),
}

impl OpenVault {
    /// Prompt for the master password and unlock the target.
    pub fn unlock(ctx: &Context) -> Result<Self> {
        let path = ctx.target.path();
        if !path.exists() {
            return Err(SafeKeepError::VaultNotFound(path.to_path_buf()));
        }
        let password = prompt_password_for_vault(Some(ctx.target.id().as_str()))?;
        Self::unlock_with(ctx, &password)
    }

    /// Unlock the target with a password the caller already has.
    pub fn unlock_with(ctx: &Context, password: &str) -> Result<Self> {
        let params = ctx.settings.argon2_params();

        match &ctx.target {
            Target::File(path) => {
                let raw = codec::read_vault_text(path)?;
                let mut session = FileSession::new(params);
                session.unlock(&raw, password)?;
                Ok(OpenVault::File {
                    path: path.clone(),
                    session,
                })
            }
            Target::Store(path) => {
                if !path.exists() {
                    return Err(SafeKeepError::VaultNotFound(path.clone()));
                }
                let mut session = KeyedSession::new(KeyedDatabase::open(path)?, params);
                if !session.master_exists()? {
                    return Err(SafeKeepError::MasterNotInitialized);
                }
                session.unlock(password)?;
                Ok(OpenVault::Keyed(session))
            }
        }
    }

    /// Entry store for the unlocked vault.
    pub fn store(&mut self) -> Result<Box<dyn EntryStore + '_>> {
        match self {
            OpenVault::File { session, .. } => Ok(Box::new(session.entries()?)),
            OpenVault::Keyed(session) => Ok(Box::new(session.entries()?)),
        }
    }

    /// Write pending changes. Keyed stores write through, so only the
    /// file backend has anything to do here.
    pub fn persist(&mut self) -> Result<()> {
        match self {
            OpenVault::File { path, session } => {
                let token = session.seal()?;
                codec::write_atomic(path, token.as_bytes())
            }
            OpenVault::Keyed(_) => Ok(()),
        }
    }

    /// Switch to `new_password`, re-encrypting everything it protects.
    /// Returns the number of entries affected.
    pub fn change_password(&mut self, new_password: &str) -> Result<usize> {
        match self {
            OpenVault::File { session, .. } => {
                session.change_password(new_password)?;
                let count = session.document()?.entries.len();
                self.persist()?;
                Ok(count)
            }
            OpenVault::Keyed(session) => session.change_password(new_password),
        }
    }

    /// The decrypted document, for the file backend only.
    pub fn document(&self) -> Option<&VaultDocument> {
        match self {
            OpenVault::File { session, .. } => session.document().ok(),
            OpenVault::Keyed(_) => None,
        }
    }

    /// Human-readable name for messages.
    pub fn label(&self) -> String {
        match self {
            OpenVault::File { path, session } => match session.document() {
                Ok(doc) => format!("'{}' ({})", doc.display_name(), path.display()),
                Err(_) => path.display().to_string(),
            },
            OpenVault::Keyed(_) => "keyed store".to_string(),
        }
    }
}
