// src/cli/dispatch.rs
//! Routes a parsed command to its handler.

use anyhow::Result;

use super::args::Commands;
use super::handlers::{
    handle_bowtie, handle_cutoff_sweep, handle_evolve, handle_extract, handle_persistent, Context,
};
use crate::exit::RecnetExit;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands, ctx: &Context) -> Result<RecnetExit> {
    match command {
        Commands::Bowtie { day, cutoff } => handle_bowtie(ctx, day, cutoff),
        Commands::Evolve { cutoff, days } => handle_evolve(ctx, cutoff, days),
        Commands::CutoffSweep { day, min, max } => handle_cutoff_sweep(ctx, day, min, max),
        Commands::Extract { day, all } => handle_extract(ctx, day, all),
        Commands::Persistent { out } => handle_persistent(ctx, out.as_deref()),
    }
}
