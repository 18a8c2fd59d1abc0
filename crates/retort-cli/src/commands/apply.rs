//! Apply command - run an operation pipeline and write the result.

use std::path::PathBuf;

use colored::Colorize;
use retort::{Session, TransformOperation};

pub fn run(
    file: PathBuf,
    ops: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ops_json = std::fs::read_to_string(&ops)
        .map_err(|e| format!("cannot read operations file '{}': {e}", ops.display()))?;
    let pipeline: Vec<TransformOperation> = serde_json::from_str(&ops_json)?;

    if pipeline.is_empty() {
        println!(
            "{} Operations file contains no operations.",
            "Warning:".yellow().bold()
        );
        return Ok(());
    }

    let mut session = Session::open_path(&file)?;
    println!(
        "{} {} operations to {}",
        "Applying".cyan().bold(),
        pipeline.len().to_string().white().bold(),
        session.source().file
    );

    for operation in &pipeline {
        let change = session.apply(operation)?;
        println!(
            "  {} {} ({} -> {} rows)",
            "ok".green().bold(),
            change.description,
            change.rows_before,
            change.rows_after
        );
        if verbose && !change.columns_added.is_empty() {
            println!(
                "     {} {}",
                "added:".dimmed(),
                change.columns_added.join(", ").dimmed()
            );
        }
    }

    let output_path = output.unwrap_or_else(|| {
        let name = session.download_name();
        match file.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    });

    let bytes = session.export()?;
    std::fs::write(&output_path, bytes)
        .map_err(|e| format!("cannot write '{}': {e}", output_path.display()))?;

    println!();
    println!(
        "{} {} ({} rows)",
        "Saved".green().bold(),
        output_path.display().to_string().cyan(),
        session.table().row_count()
    );

    Ok(())
}
