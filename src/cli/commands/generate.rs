//! `safekeep generate`: turn a plain JSON entry list into a `.vault` file.
//!
//! Usage:
//!   safekeep generate passwords.json                 # writes passwords.vault
//!   safekeep generate export.json -o work.vault --name "Work"

use std::fs;
use std::path::Path;

use crate::cli::open::Target;
use crate::cli::output;
use crate::cli::prompt_new_password;
use crate::config::Settings;
use crate::errors::{Result, SafeKeepError};
use crate::vault::import::{document_from_json, sibling_vault_path};
use crate::vault::write_vault_file;

/// Execute the `generate` command.
pub fn execute(input: &Path, output_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let json = fs::read_to_string(input).map_err(|e| {
        SafeKeepError::InvalidImport(format!("cannot read {}: {e}", input.display()))
    })?;
    let mut document = document_from_json(&json, name)?;

    let target = output_path.map_or_else(|| sibling_vault_path(input), Path::to_path_buf);
    if target.exists() {
        return Err(SafeKeepError::VaultAlreadyExists(target));
    }

    let password = prompt_new_password()?;
    write_vault_file(&target, &document, &password, &settings.argon2_params())?;

    let count = document.entries.len();
    document.wipe();

    crate::audit::log_audit(
        &Target::File(target.clone()),
        "generate",
        None,
        Some(&format!("{count} entries from {}", input.display())),
    );

    output::success(&format!(
        "Generated {} with {count} entries",
        target.display()
    ));
    output::warning(&format!(
        "{} still holds the passwords in plain text — delete it when done.",
        input.display()
    ));

    Ok(())
}
