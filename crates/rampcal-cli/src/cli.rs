//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rampcal: calibration steps for detector ramp exposures
#[derive(Parser)]
#[command(name = "rampcal")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data-quality arrays of a raw ramp exposure
    DqInit {
        /// Path to the exposure document (JSON)
        #[arg(value_name = "EXPOSURE")]
        exposure: PathBuf,

        /// Explicit mask artifact to merge, bypassing table lookup
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Reference-selection table (TSV) used when no explicit mask is given
        #[arg(short = 't', long)]
        reference_table: Option<PathBuf>,

        /// Output path (default: <stem>_dqinit.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show exposure metadata and a data-quality summary
    Info {
        /// Path to the exposure document (JSON)
        #[arg(value_name = "EXPOSURE")]
        exposure: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
