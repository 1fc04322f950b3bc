//! CLI entrypoint for thesis-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod context;
mod logging;

use anyhow::{Result, anyhow};
use clap::Parser;
use context::AppContext;
use thesis_infrastructure::ConfigLoader;
use thesis_presentation::{Cli, Command};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = logging::init(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting thesis-quorum");

    if let Command::ShowConfig = cli.command {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{:#?}", config);
        let issues = config.validate();
        if issues.is_empty() {
            println!("\nConfiguration is valid.");
        } else {
            println!("\nProblems:");
            for issue in issues {
                println!("  - {}", issue);
            }
        }
        return Ok(());
    }

    let ctx = AppContext::new(config, cli.quiet)?;

    match cli.command {
        Command::Generate(args) => commands::generate(&ctx, args, cli.format).await,
        Command::Select(args) => commands::select(&ctx, args, cli.format).await,
        Command::Refine(args) => commands::refine(&ctx, args, cli.format).await,
        Command::ShowConfig => Ok(()),
    }
}
