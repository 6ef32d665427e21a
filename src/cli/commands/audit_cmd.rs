//! `safekeep audit`: display the audit log kept next to the vault.
//!
//! Usage:
//!   safekeep audit               # show last 50 entries
//!   safekeep audit --last 20     # show last 20
//!   safekeep audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::open::Context;
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, SafeKeepError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let since_dt = since.map(parse_duration).transpose()?;

    let audit = AuditLog::open(&ctx.target.dir())
        .ok_or_else(|| SafeKeepError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let invalid = || {
        SafeKeepError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        ))
    };

    let (split, _) = input.char_indices().last().ok_or_else(invalid)?;
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().map_err(|_| invalid())?;
    if num < 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "d" => chrono::Duration::try_days(num),
        "h" => chrono::Duration::try_hours(num),
        "m" => chrono::Duration::try_minutes(num),
        _ => return Err(invalid()),
    };

    duration
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Entry", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry
                .entry_id
                .map_or_else(|| "-".to_string(), |id| format!("#{id}")),
            entry.details.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "generate" => style(op).green().to_string(),
        "add" | "edit" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "rotate-key" => style(op).yellow().to_string(),
        "show" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
