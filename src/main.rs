use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use regdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Compute metrics as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for regdash::AppCommand {
    fn from(cmd: Commands) -> regdash::AppCommand {
        match cmd {
            Commands::Summary { json } => regdash::AppCommand::Summary { json },
            Commands::Monthly => regdash::AppCommand::Monthly,
            Commands::Records => regdash::AppCommand::Records,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display revenue and lifecycle summary
    Summary {
        /// Print the metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display month-by-month registrations and revenue
    Monthly,
    /// Display every domain with its lifecycle status
    Records,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => regdash::cli::setup::setup(),
        Some(cmd) => {
            regdash::run_command(cmd.into(), cli.config_path.as_deref(), cli.as_of).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
