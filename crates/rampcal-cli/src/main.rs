//! rampcal CLI - calibration steps for detector ramp exposures.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::DqInit {
            exposure,
            reference,
            reference_table,
            output,
        } => commands::dq_init::run(exposure, reference, reference_table, output, cli.verbose),

        Commands::Info { exposure, json } => commands::info::run(exposure, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
