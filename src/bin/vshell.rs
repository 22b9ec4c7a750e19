//! vshell CLI Binary
//!
//! Loads configuration and the seed, then runs a script or an interactive session.

use clap::Parser;
use std::process;
use tracing::info;
use vshell::logging::init_logging;
use vshell::tooling::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // A broken seed cannot serve any command
    let mut context = match CliContext::new(config, cli.seed.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading seed: {}", e);
            process::exit(1);
        }
    };

    let session = context.session();
    info!(
        name = %session.name(),
        seed = ?cli.seed,
        script = ?cli.script,
        debug = cli.debug,
        user = %session.interpreter().identity().user,
        "vshell starting"
    );

    match context.run(cli.script.as_deref()) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
