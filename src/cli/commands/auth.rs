//! `safekeep auth`: manage authentication helpers.
//!
//! - `safekeep auth keyring`: save the master password to the OS keyring
//! - `safekeep auth keyring --delete`: remove it again
//!
//! When the keyring feature is not compiled in, these commands return
//! a helpful error message.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute `safekeep auth keyring`: save or delete the cached password.
pub fn execute_keyring(cli: &Cli, delete: bool) -> Result<()> {
    #[cfg(feature = "keyring-store")]
    {
        use crate::cli::open::{Context, OpenVault};
        use crate::cli::output;

        let ctx = Context::load(cli)?;
        let vault_id = ctx.target.id();

        if delete {
            crate::keyring::delete_password(&vault_id)?;
            output::success("Password removed from OS keyring.");
        } else {
            // The user is setting the cached password explicitly, so skip
            // the keyring lookup and verify what they typed.
            let password = crate::cli::prompt_password_for_vault(None)?;
            OpenVault::unlock_with(&ctx, &password)?;

            crate::keyring::store_password(&vault_id, &password)?;
            output::success("Password saved to OS keyring. Future opens will be automatic.");
        }

        ctx.audit("auth-keyring", None, Some(if delete { "removed" } else { "saved" }));
        Ok(())
    }

    #[cfg(not(feature = "keyring-store"))]
    {
        let _ = (cli, delete);
        Err(crate::errors::SafeKeepError::KeyringError(
            "keyring support not compiled — rebuild with `cargo build --features keyring-store`"
                .into(),
        ))
    }
}
