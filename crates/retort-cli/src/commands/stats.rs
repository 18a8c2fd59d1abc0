//! Stats command - descriptive statistics for a numeric column.

use std::path::PathBuf;

use colored::Colorize;
use retort::Session;

pub fn run(
    file: PathBuf,
    column: String,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open_path(&file)?;
    let summary = session.summary(&column)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} '{}' ({} non-null values)",
        "Statistics for".cyan().bold(),
        column.white().bold(),
        summary.count
    );
    println!("  {:10} {}", "mean".yellow(), summary.mean);
    println!("  {:10} {}", "median".yellow(), summary.median);
    println!(
        "  {:10} {}",
        "mode".yellow(),
        summary
            .modes
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  {:10} {}", "std dev".yellow(), summary.std_dev);

    Ok(())
}
