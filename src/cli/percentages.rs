use anyhow::{Context, Result};
use std::path::PathBuf;

use sitefrac::table::{Delimiter, Table};

/// Write the selected columns as fractions of their row sum
pub fn run(input: PathBuf, columns: Vec<String>, output: Option<PathBuf>) -> Result<()> {
    let table =
        Table::from_path(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let fractions = table
        .row_percentages(&columns)
        .context("Failed to compute row percentages")?;

    match output {
        Some(path) => {
            log::info!("Saving {}", path.display());
            fractions.write_csv(&path)?;
        }
        None => fractions.to_writer(std::io::stdout().lock(), Delimiter::Comma)?,
    }
    Ok(())
}
