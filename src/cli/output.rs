//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Entry;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Id, Site, Username, URL, Updated).
///
/// Passwords are never part of this table.
pub fn print_entries_table(entries: &[Entry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Site", "Username", "URL", "Updated"]);

    for e in entries {
        table.add_row(vec![
            e.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            e.site_name.clone(),
            e.username.clone().unwrap_or_else(|| "-".to_string()),
            e.site_url.clone().unwrap_or_else(|| "-".to_string()),
            e.modified_at.format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one entry, optionally including the password.
pub fn print_entry_details(entry: &Entry, reveal_password: bool) {
    let label = |name: &str| style(format!("{name:>10}")).bold().to_string();
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    if let Some(id) = entry.id {
        println!("{} {id}", label("Id:"));
    }
    println!("{} {}", label("Site:"), entry.site_name);
    println!("{} {}", label("URL:"), or_dash(&entry.site_url));
    println!("{} {}", label("Username:"), or_dash(&entry.username));
    if reveal_password {
        println!("{} {}", label("Password:"), entry.password);
    } else {
        println!("{} {}", label("Password:"), style("********").dim());
    }
    println!("{} {}", label("Notes:"), or_dash(&entry.notes));
    println!("{} {}", label("Created:"), entry.created_at.format(TIME_FORMAT));
    println!("{} {}", label("Modified:"), entry.modified_at.format(TIME_FORMAT));
}
