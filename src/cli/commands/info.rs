//! `safekeep info`: show vault metadata.

use console::style;

use crate::cli::open::{Context, OpenVault, Target};
use crate::cli::Cli;
use crate::errors::Result;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Execute the `info` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;
    let count = vault.store()?.list()?.len();

    let row = |label: &str, value: &str| {
        println!("{} {value}", style(format!("{label:>9}")).bold());
    };

    match (&ctx.target, vault.document()) {
        (Target::File(path), Some(doc)) => {
            row("Vault:", doc.display_name());
            row("Path:", &path.display().to_string());
            row("Version:", &doc.metadata.version);
            row("Created:", &doc.metadata.created_at.format(TIME_FORMAT).to_string());
            row("Updated:", &doc.metadata.updated_at.format(TIME_FORMAT).to_string());
        }
        (target, _) => {
            row("Store:", &target.path().display().to_string());
            row("Backend:", "keyed (SQLite)");
        }
    }
    row("Entries:", &count.to_string());

    Ok(())
}
