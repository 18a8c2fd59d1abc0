//! Inspect command - show the decoded schema and a data preview.

use std::path::PathBuf;

use colored::Colorize;
use retort::Session;
use serde::Serialize;

#[derive(Serialize)]
struct ColumnInfo {
    name: String,
    dtype: retort::ColumnType,
    nulls: usize,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    source: &'a retort::SourceMetadata,
    columns: Vec<ColumnInfo>,
    preview: Vec<Vec<String>>,
}

pub fn run(
    file: PathBuf,
    rows: usize,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open_path(&file)?;
    let table = session.table();
    let source = session.source();

    let columns: Vec<ColumnInfo> = table
        .columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name.clone(),
            dtype: c.dtype,
            nulls: c.null_count(),
        })
        .collect();

    let preview: Vec<Vec<String>> = (0..table.row_count().min(rows))
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|c| c.values[row].render())
                .collect()
        })
        .collect();

    if json {
        let report = InspectReport {
            source,
            columns,
            preview,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({}, {} rows x {} columns)",
        "Inspecting".cyan().bold(),
        source.file.white().bold(),
        source.format,
        source.row_count,
        source.column_count
    );
    if verbose {
        println!("  {} {}", "hash:".dimmed(), source.hash.dimmed());
        println!("  {} {} bytes", "size:".dimmed(), source.size_bytes);
    }
    println!();

    println!("{}", "Columns".cyan().bold());
    for info in &columns {
        println!(
            "  {:24} {:10} {} null",
            info.name,
            info.dtype.to_string().yellow(),
            info.nulls
        );
    }
    println!();

    if !preview.is_empty() {
        println!("{}", "Preview".cyan().bold());
        println!("  {}", table.column_names().join(" | ").bold());
        for row in &preview {
            println!("  {}", row.join(" | "));
        }
    }

    Ok(())
}
