//! `safekeep add`: store a new entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::{Cli, EntryFields};
use crate::crypto::generator::{generate_password, DEFAULT_LENGTH};
use crate::errors::{Result, SafeKeepError};
use crate::vault::EntryDraft;

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, fields: &EntryFields) -> Result<()> {
    let ctx = Context::load(cli)?;

    let password = entry_password(fields, site)?;
    let draft = EntryDraft {
        site_name: site.to_string(),
        site_url: fields.url.clone(),
        username: fields.username.clone(),
        password: password.to_string(),
        notes: fields.notes.clone(),
    };
    // Fail before asking for the master password.
    draft.validate()?;

    let mut vault = OpenVault::unlock(&ctx)?;
    let id = vault.store()?.create(draft)?;
    vault.persist()?;

    ctx.audit("add", Some(id), None);
    output::success(&format!("Added entry #{id} '{site}' to {}", vault.label()));

    Ok(())
}

/// The entry password from `--generate` or, failing that, from
/// `read_entry_password`.
pub(crate) fn entry_password(fields: &EntryFields, site: &str) -> Result<Zeroizing<String>> {
    if fields.generate {
        let length = fields.length.map_or(DEFAULT_LENGTH, usize::from);
        output::info(&format!("Generated a {length}-character password for {site}"));
        return Ok(generate_password(length));
    }
    read_entry_password(fields.password.as_deref(), site)
}

/// Get the entry password from one of three sources: the `--password`
/// flag, piped stdin, or a hidden interactive prompt.
pub(crate) fn read_entry_password(flag: Option<&str>, site: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = flag {
        output::warning("Password provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {site}"))
        .interact()
        .map_err(|e| SafeKeepError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
