//! # sitefrac
//!
//! A command-line tool for post-processing isotopologue peak tables.
//!
//! ## Usage
//!
//! ```bash
//! # Label, correct and site-split a raw export
//! sitefrac analyse raw.csv result.csv --config sitefrac.toml
//!
//! # Split an already corrected table
//! sitefrac split corrected.csv --sites sites/ --map K1=2C13 -o result.csv
//!
//! # Row fractions of selected isotopologues
//! sitefrac percentages result.csv --columns "No label,2C13,4C13"
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
