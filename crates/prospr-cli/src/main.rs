mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    match cli.command {
        Commands::Fold(args) => commands::fold::run(&args),
        Commands::Check(args) => commands::check::run(&args),
    }
}
