//! Example: clean a tabular data file with Retort.
//!
//! Usage:
//!   cargo run --example pipeline -- <file_path>
//!
//! Example:
//!   cargo run --example pipeline -- ventas.csv

use std::env;
use std::path::Path;

use retort::{Session, TransformOperation};

fn main() -> retort::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example pipeline -- <file_path>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    if !Path::new(file_path).exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let mut session = Session::open_path(file_path)?;

    println!("## Source");
    println!("  File: {}", session.source().file);
    println!("  Format: {}", session.source().format);
    println!("  Rows: {}", session.source().row_count);
    println!("  Columns: {}", session.source().column_count);
    println!();

    println!("## Schema");
    for column in session.table().columns() {
        println!(
            "  {:20} {:10} {} null",
            column.name,
            column.dtype.to_string(),
            column.null_count()
        );
    }
    println!();

    println!("## Cleaning");
    for operation in [
        TransformOperation::DropDuplicates,
        TransformOperation::DropNulls,
    ] {
        let change = session.apply(&operation)?;
        println!(
            "  {} ({} -> {} rows)",
            change.description, change.rows_before, change.rows_after
        );
    }
    println!();

    println!("## Statistics");
    for name in session
        .table()
        .numeric_columns()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
    {
        let summary = session.summary(&name)?;
        println!(
            "  {:20} mean={:.3} median={:.3} std={:.3}",
            name, summary.mean, summary.median, summary.std_dev
        );
    }
    println!();

    println!("Download as: {}", session.download_name());
    Ok(())
}
