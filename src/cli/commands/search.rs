//! `safekeep search`: filter entries by text.

use crate::cli::commands::list::plural;
use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;
    let matches = vault.store()?.search(query)?;

    if matches.is_empty() {
        output::info(&format!("No entries match '{query}'."));
        return Ok(());
    }

    output::info(&format!(
        "{} matching entr{}",
        matches.len(),
        plural(matches.len())
    ));
    output::print_entries_table(&matches);

    Ok(())
}
