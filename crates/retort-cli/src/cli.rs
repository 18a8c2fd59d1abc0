//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Retort: clean and transform tabular data files
#[derive(Parser)]
#[command(name = "retort")]
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
    /// Show the decoded schema and a preview of a data file
    Inspect {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of preview rows to print
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a pipeline of operations and write the transformed file
    Apply {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to a JSON array of operations
        #[arg(short = 's', long, value_name = "OPS_FILE")]
        ops: PathBuf,

        /// Output path (default: transformado_<file> beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print descriptive statistics for a numeric column
    Stats {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to summarize
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
