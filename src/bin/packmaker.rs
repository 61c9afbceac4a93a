//! Packmaker CLI Binary
//!
//! Command-line interface for building and reverting asset packs.

use clap::Parser;
use packmaker::logging::init_logging;
use packmaker::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let mut config = match CliContext::load_config(&cli.workspace, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = cli
        .apply_logging_overrides(&mut config.logging)
        .and_then(|_| init_logging(Some(&config.logging)))
    {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let mut context = match CliContext::with_config(cli.workspace.clone(), config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing workspace: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
