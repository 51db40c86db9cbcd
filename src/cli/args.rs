// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

#[derive(Parser)]
#[command(name = "recnet", version, about = "Bow-tie structure of recommendation networks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,
    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
    /// Debug-level logging (overridden by `RUST_LOG`)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decompose one day's snapshot
    Bowtie {
        #[arg(long)]
        day: usize,
        /// Recommendation positions below this become edges
        #[arg(long)]
        cutoff: Option<u32>,
    },
    /// Decompose every day at a fixed cutoff
    Evolve {
        #[arg(long)]
        cutoff: Option<u32>,
        /// Number of days from the start of the window
        #[arg(long)]
        days: Option<usize>,
    },
    /// Decompose one day over a range of cutoffs
    CutoffSweep {
        #[arg(long)]
        day: Option<usize>,
        #[arg(long)]
        min: Option<u32>,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Convert raw recommendation lists into snapshot files
    Extract {
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        day: Option<usize>,
        /// Every day of the observation window
        #[arg(long)]
        all: bool,
    },
    /// Extract links that persist across the window
    Persistent {
        /// Write the `Source,Target` link list here
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}
