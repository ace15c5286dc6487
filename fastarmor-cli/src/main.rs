//! fastarmor CLI entry point.
//!
//! Parses arguments, dispatches to the subcommand handlers and maps the
//! resulting error class to a process exit code.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = dispatch(cli, &writer).await {
        eprintln!("fastarmor: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Run(args) => {
            commands::run::execute(args, &cli.config, cli.log_level.as_deref(), writer).await
        }
        Commands::List(_) => commands::list::execute(writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, writer).await,
    }
}
