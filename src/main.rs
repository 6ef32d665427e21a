use clap::Parser;
use tracing_subscriber::EnvFilter;

use safekeep::cli::commands;
use safekeep::cli::{AuthAction, Cli, Commands};

/// Environment variable holding the log filter (e.g. `safekeep=debug`).
const LOG_ENV: &str = "SAFEKEEP_LOG";

fn main() {
    // Diagnostics go to stderr so they never mix with command output.
    // Secrets are never passed to tracing macros at any level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("safekeep=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { ref name } => commands::init::execute(&cli, name.as_deref()),
        Commands::Add {
            ref site,
            ref fields,
        } => commands::add::execute(&cli, site, fields),
        Commands::List => commands::list::execute(&cli),
        Commands::Search { ref query } => commands::search::execute(&cli, query),
        Commands::Show { id, copy } => commands::show::execute(&cli, id, copy),
        Commands::Edit {
            id,
            ref site,
            ref fields,
            prompt_password,
        } => commands::edit::execute(&cli, id, site.as_deref(), fields, prompt_password),
        Commands::Delete { id, force } => commands::delete::execute(&cli, id, force),
        Commands::Generate {
            ref input,
            ref output,
            ref name,
        } => commands::generate::execute(input, output.as_deref(), name.as_deref()),
        Commands::RotateKey => commands::rotate::execute(&cli),
        Commands::Info => commands::info::execute(&cli),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Auth { ref action } => match action {
            AuthAction::Keyring { delete } => commands::auth::execute_keyring(&cli, *delete),
        },
        Commands::Completions { shell } => {
            safekeep::cli::print_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        safekeep::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
