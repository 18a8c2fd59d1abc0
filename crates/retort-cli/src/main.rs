//! Retort CLI - clean and transform tabular data files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file, rows, json } => {
            commands::inspect::run(file, rows, json, cli.verbose)
        }

        Commands::Apply { file, ops, output } => {
            commands::apply::run(file, ops, output, cli.verbose)
        }

        Commands::Stats { file, column, json } => {
            commands::stats::run(file, column, json, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
