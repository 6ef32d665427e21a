//! `safekeep init`: create an empty vault or set the store's master password.

use std::fs;
use std::path::Path;

use crate::cli::open::{Context, OpenVault, Target};
use crate::cli::output;
use crate::cli::{prompt_new_password, Cli};
use crate::errors::{Result, SafeKeepError};
use crate::session::{FileSession, KeyedSession};
use crate::store::KeyedDatabase;
use crate::vault::create_empty;

/// Execute the `init` command.
pub fn execute(cli: &Cli, name: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;

    match &ctx.target {
        Target::File(path) => init_file(&ctx, path, name)?,
        Target::Store(path) => {
            if name.is_some() {
                output::warning("--name only applies to vault files; ignoring it.");
            }
            init_store(&ctx, path)?;
        }
    }

    ctx.audit("init", None, None);

    output::tip("Run `safekeep add <SITE>` to store your first password.");
    output::tip("Run `safekeep list` to see all entries.");

    Ok(())
}

fn init_file(ctx: &Context, path: &Path, name: Option<&str>) -> Result<()> {
    if path.exists() {
        output::tip("Use `safekeep add` to add entries to the existing vault.");
        return Err(SafeKeepError::VaultAlreadyExists(path.to_path_buf()));
    }
    ensure_parent_dir(path)?;

    let password = prompt_new_password()?;
    let name = name.or(ctx.settings.vault_name.as_deref());

    let mut session = FileSession::new(ctx.settings.argon2_params());
    session.open_document(create_empty(name), &password)?;
    let mut vault = OpenVault::File {
        path: path.to_path_buf(),
        session,
    };
    vault.persist()?;

    output::success(&format!("Vault {} created", vault.label()));
    Ok(())
}

fn init_store(ctx: &Context, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut session = KeyedSession::new(KeyedDatabase::open(path)?, ctx.settings.argon2_params());

    if session.master_exists()? {
        return Err(SafeKeepError::MasterAlreadyInitialized);
    }

    let password = prompt_new_password()?;
    session.initialize(&password)?;

    output::success(&format!("Keyed store initialized at {}", path.display()));
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }
    Ok(())
}
