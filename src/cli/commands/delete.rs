//! `safekeep delete`: remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, SafeKeepError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;

    let mut store = vault.store()?;
    let entry = store.get(id)?.ok_or(SafeKeepError::EntryNotFound(id))?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry #{id} '{}'?", entry.site_name))
            .default(false)
            .interact()
            .map_err(|e| SafeKeepError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !store.delete(id)? {
        return Err(SafeKeepError::EntryNotFound(id));
    }
    drop(store);
    vault.persist()?;

    ctx.audit("delete", Some(id), None);
    output::success(&format!("Deleted entry #{id} '{}'", entry.site_name));

    Ok(())
}
