//! `safekeep show`: print one entry, or copy its password.

use zeroize::Zeroize;

use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, SafeKeepError};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: i64, copy: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;
    let mut entry = vault
        .store()?
        .get(id)?
        .ok_or(SafeKeepError::EntryNotFound(id))?;

    if copy {
        copy_to_clipboard(&entry.password)?;
        output::print_entry_details(&entry, false);
        output::success("Password copied to clipboard.");
    } else {
        output::print_entry_details(&entry, true);
    }
    entry.password.zeroize();

    ctx.audit("show", Some(id), copy.then_some("copied"));
    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| SafeKeepError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| SafeKeepError::CommandFailed(format!("failed to copy to clipboard: {e}")))
}
