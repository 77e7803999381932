use anyhow::{Context, Result};
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use sitefrac::table::Table;

/// Display information about a table file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let table = Table::from_path(&file).context("Failed to read table")?;

    #[cfg(feature = "colorized_output")]
    println!("{}", style("Table Information").bold().cyan());
    #[cfg(not(feature = "colorized_output"))]
    println!("Table Information");
    println!("=================");
    println!("File: {}", file.display());
    println!();

    println!("Key column: {}", table.key_name());
    println!("  Rows: {}", table.n_rows());
    if let (Some(first), Some(last)) = (table.keys().iter().min(), table.keys().iter().max()) {
        println!("  Range: {} .. {}", first, last);
    }
    println!();

    println!("Columns:");
    for (i, column) in table.columns().iter().enumerate() {
        let missing = column.values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            println!("  {:3}. {} ({} missing)", i + 1, column.name, missing);
        } else {
            println!("  {:3}. {}", i + 1, column.name);
        }
    }

    if let Some(max) = table.max_value() {
        println!();
        println!("Largest intensity: {}", max);
    }

    Ok(())
}
