// CLI module: server startup and maintenance commands

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::ServerSettings;

/// Progress backend: development plans and peer feedback
#[derive(Parser, Debug)]
#[command(name = "progress-backend")]
#[command(about = "Personnel development tracking backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run migrations, seed roles and the initial admin, then serve HTTP (default)
    Serve,

    /// Run pending database migrations and exit
    Migrate,
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler; no subcommand
/// means `serve`.
pub async fn execute_command(cli: Cli, settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_server(settings).await,
        Commands::Migrate => migrate::run_migrations(&settings).await,
    }
}
