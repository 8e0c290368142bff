// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Verify {
            universe,
            config,
            format,
            quiet,
        }) => commands::cmd_verify(&universe, config.as_deref(), &format, quiet),
        Some(Commands::Order {
            universe,
            config,
            uninstall,
        }) => commands::cmd_order(&universe, config.as_deref(), uninstall),
        Some(Commands::Provides {
            universe,
            capability,
            config,
        }) => commands::cmd_provides(&universe, config.as_deref(), &capability),
        Some(Commands::Requires {
            universe,
            name,
            config,
        }) => commands::cmd_requires(&universe, config.as_deref(), &name),
        Some(Commands::Obsoletes {
            universe,
            name,
            config,
        }) => commands::cmd_obsoletes(&universe, config.as_deref(), &name),
        Some(Commands::Mark {
            universe,
            packages,
            config,
            dependents,
        }) => commands::cmd_mark(&universe, config.as_deref(), &packages, dependents),
        None => {
            // No command provided, show help
            println!("rpmgraph v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'rpmgraph --help' for usage information");
            Ok(())
        }
    }
}
