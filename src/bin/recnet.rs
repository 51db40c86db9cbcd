// src/bin/recnet.rs
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use recnet_core::cli::{self, Cli, Context};
use recnet_core::config::Config;
use recnet_core::exit::RecnetExit;

fn main() -> RecnetExit {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return RecnetExit::Success;
    };

    let result = Config::load(&cli.config)
        .map_err(anyhow::Error::from)
        .and_then(|config| cli::dispatch::execute(command, &Context::new(config, cli.json)));

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            RecnetExit::for_error(&e)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
