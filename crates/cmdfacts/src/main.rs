//! cmdfacts CLI - Extract compilation facts from intercepted build commands
//!
//! This is the main entry point for the cmdfacts command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cmdfacts_core::ExtensionConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    let conf = ExtensionConfig::load(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration{}",
            cli.config
                .as_ref()
                .map(|p| format!(" from {}", p))
                .unwrap_or_default()
        )
    })?;

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet, &conf.log_level);

    // Run command
    match cli.command {
        Commands::Parse(args) => commands::parse::run(args, conf),
        Commands::Extensions(args) => commands::extensions::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
///
/// `-q` and `-v` win over the configured level.
fn init_tracing(verbose: u8, quiet: bool, log_level: &str) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(log_level.to_lowercase()),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
