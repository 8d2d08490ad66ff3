//! Operator CLI: argument definitions, handlers, and output formatting.

pub mod command;
pub mod config;
pub mod customer;
pub mod menu;
pub mod output;
pub mod supplier;

use tracing::debug;

use self::command::{Cli, Commands, ConfigCommand};
use crate::domain::Navigation;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Run a parsed command line to completion.
///
/// `config validate` reads the file strictly; every other command falls back
/// to built-in defaults when the file is absent.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig { json: cli.json });

    if let Commands::Config(ConfigCommand::Validate) = cli.command {
        return config::execute_validate(&cli.config);
    }

    let settings = Config::load_or_default(&cli.config)?;
    settings.init_logging();
    debug!(path = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Menu(args) => {
            let permissions = settings.permission_table()?;
            menu::execute(&permissions, &Navigation::builtin(), &args)
        }
        Commands::Supplier(command) => {
            let ctx = bootstrap(&settings).await?;
            supplier::execute(&ctx, command).await
        }
        Commands::Customer(command) => {
            let ctx = bootstrap(&settings).await?;
            customer::execute(&ctx, command).await
        }
        Commands::Config(_) => Ok(()),
    }
}
