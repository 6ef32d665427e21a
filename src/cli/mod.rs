//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod open;
pub mod output;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use zeroize::Zeroizing;

use crate::errors::{Result, SafeKeepError};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before any password prompt.
pub const PASSWORD_ENV: &str = "SAFEKEEP_PASSWORD";

/// SafeKeep CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "safekeep", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to use (default: from .safekeep.toml, else passwords.vault)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Use the SQLite keyed store at this path instead of a vault file
    #[arg(long, global = true, conflicts_with = "vault")]
    pub store: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new empty vault (or set the store's master password)
    Init {
        /// Vault name stored in the metadata
        #[arg(long)]
        name: Option<String>,
    },

    /// Add a new entry
    Add {
        /// Site or service name
        site: String,
        #[command(flatten)]
        fields: EntryFields,
    },

    /// List all entries (passwords are never shown)
    List,

    /// Search entries by site, URL, username or notes
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Show one entry, including its password
    Show {
        /// Entry id (see `safekeep list`)
        id: i64,
        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Edit an entry; fields that are not given keep their values
    Edit {
        /// Entry id
        id: i64,
        /// New site name
        #[arg(long)]
        site: Option<String>,
        #[command(flatten)]
        fields: EntryFields,
        /// Read the new password from stdin or a hidden prompt
        #[arg(long, conflicts_with_all = ["password", "generate"])]
        prompt_password: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a plain JSON list of entries into a new vault file
    Generate {
        /// JSON file: an array of entries or an object with `entries`
        input: PathBuf,
        /// Output path (default: next to the input, with a .vault extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Vault name for the generated vault
        #[arg(long)]
        name: Option<String>,
    },

    /// Change the master password and re-encrypt
    RotateKey,

    /// Show vault metadata
    Info,

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Manage authentication helpers
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Optional entry fields shared by `add` and `edit`.
#[derive(clap::Args, Debug, Default)]
pub struct EntryFields {
    /// Site URL
    #[arg(long)]
    pub url: Option<String>,
    /// Username or e-mail
    #[arg(short, long)]
    pub username: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Password (omit for interactive prompt; visible in shell history)
    #[arg(long)]
    pub password: Option<String>,
    /// Generate a random password instead of entering one
    #[arg(long, conflicts_with = "password")]
    pub generate: bool,
    /// Length of the generated password (default: 16)
    #[arg(long, requires = "generate", value_parser = clap::value_parser!(u16).range(8..=128))]
    pub length: Option<u16>,
}

/// Auth subcommands.
#[derive(clap::Subcommand)]
pub enum AuthAction {
    /// Save the master password to the OS keyring (auto-unlock)
    Keyring {
        /// Remove password from keyring instead of saving
        #[arg(long)]
        delete: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `SAFEKEEP_PASSWORD` env var (scripts)
/// 2. OS keyring (if compiled with `keyring-store` feature)
/// 3. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password_for_vault(vault_id: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    #[cfg(feature = "keyring-store")]
    if let Some(id) = vault_id {
        // Missing entry or unavailable keyring both fall through to the prompt.
        if let Ok(Some(pw)) = crate::keyring::get_password(id) {
            return Ok(Zeroizing::new(pw));
        }
    }

    #[cfg(not(feature = "keyring-store"))]
    let _ = vault_id;

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| SafeKeepError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// Also respects `SAFEKEEP_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        check_password_length(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| SafeKeepError::CommandFailed(format!("password prompt: {e}")))?;

        if check_password_length(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Print the completion script for `shell` to stdout.
///
/// Usage: `safekeep completions bash > ~/.bash_completion.d/safekeep`
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Reject master passwords shorter than the minimum (counted in chars).
pub fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SafeKeepError::Validation(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_is_checked_in_chars() {
        assert!(check_password_length("short").is_err());
        assert!(check_password_length("exactly8").is_ok());
        assert!(check_password_length("ÄÖÜäöüßé").is_ok());
    }

    #[test]
    fn vault_and_store_conflict() {
        let parsed = Cli::try_parse_from([
            "safekeep", "--vault", "a.vault", "--store", "b.db", "list",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn add_parses_optional_fields() {
        let cli = Cli::parse_from([
            "safekeep", "add", "GitHub", "--url", "https://github.com", "-u", "octo",
        ]);
        match cli.command {
            Commands::Add { site, fields } => {
                assert_eq!(site, "GitHub");
                assert_eq!(fields.url.as_deref(), Some("https://github.com"));
                assert_eq!(fields.username.as_deref(), Some("octo"));
                assert!(fields.password.is_none());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn generate_flags_parse_and_conflict() {
        let cli = Cli::parse_from(["safekeep", "add", "Bank", "--generate", "--length", "24"]);
        match cli.command {
            Commands::Add { fields, .. } => {
                assert!(fields.generate);
                assert_eq!(fields.length, Some(24));
            }
            _ => panic!("expected add"),
        }

        assert!(Cli::try_parse_from(["safekeep", "add", "Bank", "--generate", "--password", "x"]).is_err());
        assert!(Cli::try_parse_from(["safekeep", "add", "Bank", "--length", "24"]).is_err());
        assert!(Cli::try_parse_from(["safekeep", "add", "Bank", "--generate", "--length", "4"]).is_err());
    }

    #[test]
    fn edit_prompt_password_conflicts_with_other_sources() {
        let cli = Cli::parse_from(["safekeep", "edit", "3", "--prompt-password"]);
        assert!(matches!(cli.command, Commands::Edit { id: 3, prompt_password: true, .. }));

        assert!(Cli::try_parse_from(["safekeep", "edit", "3", "--prompt-password", "--password", "x"]).is_err());
        assert!(Cli::try_parse_from(["safekeep", "edit", "3", "--prompt-password", "--generate"]).is_err());
    }

    #[test]
    fn completions_accept_known_shells_only() {
        let cli = Cli::parse_from(["safekeep", "completions", "zsh"]);
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
        assert!(Cli::try_parse_from(["safekeep", "completions", "csh"]).is_err());
    }

    #[test]
    fn global_vault_option_after_subcommand() {
        let cli = Cli::parse_from(["safekeep", "list", "--vault", "work.vault"]);
        assert_eq!(cli.vault, Some(PathBuf::from("work.vault")));
    }
}
