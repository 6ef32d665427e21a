//! `safekeep edit`: change fields of an existing entry.
//!
//! Only the fields given on the command line change. An empty value
//! (`--notes ""`) clears an optional field.

use crate::cli::commands::add::{entry_password, read_entry_password};
use crate::cli::open::{Context, OpenVault};
use crate::cli::output;
use crate::cli::{Cli, EntryFields};
use crate::errors::{Result, SafeKeepError};
use crate::vault::EntryDraft;

/// Execute the `edit` command.
pub fn execute(
    cli: &Cli,
    id: i64,
    site: Option<&str>,
    fields: &EntryFields,
    prompt_password: bool,
) -> Result<()> {
    let label = format!("entry #{id}");
    let new_password = if prompt_password {
        Some(read_entry_password(None, &label)?)
    } else if fields.generate || fields.password.is_some() {
        Some(entry_password(fields, &label)?)
    } else {
        None
    };

    if site.is_none()
        && fields.url.is_none()
        && fields.username.is_none()
        && fields.notes.is_none()
        && new_password.is_none()
    {
        return Err(SafeKeepError::CommandFailed(
            "nothing to change; pass at least one of --site, --url, --username, --notes, \
             --password, --generate, --prompt-password"
                .into(),
        ));
    }

    let ctx = Context::load(cli)?;
    let mut vault = OpenVault::unlock(&ctx)?;

    let mut store = vault.store()?;
    let current = store.get(id)?.ok_or(SafeKeepError::EntryNotFound(id))?;
    let password = new_password.as_deref().map(String::as_str);
    let (draft, changed) = merge(current.to_draft(), site, fields, password);

    if !store.update(id, draft)? {
        return Err(SafeKeepError::EntryNotFound(id));
    }
    drop(store);
    vault.persist()?;

    let changed = changed.join(", ");
    ctx.audit("edit", Some(id), Some(&format!("changed: {changed}")));
    output::success(&format!("Updated entry #{id} ({changed})"));

    Ok(())
}

/// Overlay the given fields and `password` on `draft`. Returns the names
/// of the fields whose value actually differs.
fn merge(
    mut draft: EntryDraft,
    site: Option<&str>,
    fields: &EntryFields,
    password: Option<&str>,
) -> (EntryDraft, Vec<&'static str>) {
    let mut changed = Vec::new();

    if let Some(site) = site {
        if draft.site_name != site {
            changed.push("site");
        }
        draft.site_name = site.to_string();
    }

    let optional = [
        ("url", &mut draft.site_url, &fields.url),
        ("username", &mut draft.username, &fields.username),
        ("notes", &mut draft.notes, &fields.notes),
    ];
    for (name, slot, given) in optional {
        if let Some(value) = given {
            if slot.as_deref().unwrap_or("") != value.as_str() {
                changed.push(name);
            }
            *slot = Some(value.clone());
        }
    }

    if let Some(password) = password {
        if draft.password != password {
            changed.push("password");
        }
        draft.password = password.to_string();
    }

    (draft, changed)
}
