//! `safekeep rotate-key`: change the master password.
//!
//! For a vault file the whole document is sealed again under the new
//! password. For the keyed store every stored password is re-encrypted
//! and the credential replaced in a single transaction.

use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::{prompt_new_password, Cli};
use crate::errors::Result;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;

    output::info("Enter your current master password.");
    let mut vault = OpenVault::unlock(&ctx)?;

    output::info("Choose your new master password.");
    let new_password = prompt_new_password()?;

    let count = vault.change_password(&new_password)?;

    // Keep a cached keyring password in step with the new one.
    #[cfg(feature = "keyring-store")]
    {
        let id = ctx.target.id();
        if let Ok(Some(_)) = crate::keyring::get_password(&id) {
            if crate::keyring::store_password(&id, &new_password).is_err() {
                output::warning("Could not update the password cached in the OS keyring.");
            }
        }
    }

    ctx.audit(
        "rotate-key",
        None,
        Some(&format!("{count} entries re-encrypted")),
    );
    output::success(&format!(
        "Master password changed for {} ({count} entries re-encrypted)",
        vault.label()
    ));

    Ok(())
}
