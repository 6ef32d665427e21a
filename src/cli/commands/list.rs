//! `safekeep list`: display all entries in a table.

use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;
    let entries = vault.store()?.list()?;

    if entries.is_empty() {
        output::info(&format!("No entries in {} yet.", vault.label()));
        output::tip("Run `safekeep add <SITE>` to add your first password.");
        return Ok(());
    }

    output::info(&format!("{} — {} entr{}", vault.label(), entries.len(), plural(entries.len())));
    output::print_entries_table(&entries);

    Ok(())
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
