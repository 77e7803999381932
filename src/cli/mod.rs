use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sitefrac::site::parse_assignment;

mod analyse;
mod config;
mod info;
mod percentages;
mod split;

pub use config::Config;

/// sitefrac - Isotopologue table post-processing and site-fraction redistribution
#[derive(Parser)]
#[command(name = "sitefrac")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label, correct and optionally site-split a raw measurement file
    Analyse {
        /// Raw measurement CSV/TSV (first column = sample/time key)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory with one splitting table per site
        #[arg(long, value_name = "DIR")]
        sites: Option<PathBuf>,

        /// Split COLUMN by site table SITE (repeatable, applied in order)
        #[arg(long = "map", value_name = "SITE=COLUMN", value_parser = parse_assignment)]
        mapping: Vec<(String, String)>,

        /// Skip the isotopologue correction step
        #[arg(long)]
        no_correction: bool,

        /// Correction command with {input}/{output} placeholders
        #[arg(long, value_name = "CMD", num_args = 1.., allow_hyphen_values = true)]
        corrector: Option<Vec<String>>,

        /// Rescale so the largest intensity equals this value
        #[arg(long, value_name = "VALUE")]
        relative_to: Option<f64>,

        /// Drop a column before processing (repeatable)
        #[arg(long = "drop", value_name = "COLUMN")]
        drop_columns: Vec<String>,
    },

    /// Split isotopologue columns of a corrected table by site
    Split {
        /// Corrected measurement CSV/TSV
        #[arg(value_name = "MEASUREMENTS")]
        measurements: PathBuf,

        /// Directory with one splitting table per site
        #[arg(long, value_name = "DIR")]
        sites: PathBuf,

        /// Split COLUMN by site table SITE (repeatable, applied in order)
        #[arg(long = "map", value_name = "SITE=COLUMN", value_parser = parse_assignment)]
        mapping: Vec<(String, String)>,

        /// Output CSV path (printed to stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Allowed deviation of percentage sums from 100
        #[arg(long, value_name = "POINTS", conflicts_with = "no_sum_check")]
        tolerance: Option<f64>,

        /// Do not check that percentages sum to 100
        #[arg(long)]
        no_sum_check: bool,

        /// Header prefix marking percentage columns
        #[arg(long, value_name = "PREFIX", default_value = "% ")]
        prefix: String,
    },

    /// Convert selected columns to row fractions (each row sums to 1)
    Percentages {
        /// Input CSV/TSV
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Columns to include, comma separated
        #[arg(long, value_name = "COLUMNS", value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Output CSV path (printed to stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Display information about a table file
    Info {
        /// Input CSV/TSV
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyse {
            input,
            output,
            config,
            sites,
            mapping,
            no_correction,
            corrector,
            relative_to,
            drop_columns,
        } => analyse::run(analyse::AnalyseArgs {
            input,
            output,
            config,
            sites,
            mapping,
            no_correction,
            corrector,
            relative_to,
            drop_columns,
        }),
        Commands::Split {
            measurements,
            sites,
            mapping,
            output,
            tolerance,
            no_sum_check,
            prefix,
        } => split::run(
            measurements,
            sites,
            mapping,
            output,
            tolerance,
            no_sum_check,
            prefix,
        ),
        Commands::Percentages {
            input,
            columns,
            output,
        } => percentages::run(input, columns, output),
        Commands::Info { file } => info::run(file),
    }
}
