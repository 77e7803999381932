use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use sitefrac::correction::{ExternalCorrector, IsotopologueCorrector, NoCorrection};
use sitefrac::pipeline::{analyse_rawfile, AnalysisOptions};
use sitefrac::site::{SiteFractionConfig, SiteMapping};

use super::Config;

/// Command-line arguments of `sitefrac analyse`
pub struct AnalyseArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sites: Option<PathBuf>,
    pub mapping: Vec<(String, String)>,
    pub no_correction: bool,
    pub corrector: Option<Vec<String>>,
    pub relative_to: Option<f64>,
    pub drop_columns: Vec<String>,
}

/// Label, correct and optionally split a raw measurement file
pub fn run(args: AnalyseArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let output = args.output.clone().unwrap_or_else(|| {
        let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
        args.input.with_file_name(format!("{}_processed.csv", stem))
    });

    let options = build_options(&args, &config);
    let corrector = build_corrector(&args, &config, options.isotopologue_correction)?;

    info!("sitefrac - raw file analysis");
    info!("============================");
    info!("Input:  {}", args.input.display());
    info!("Output: {}", output.display());
    info!("Correction: {}", if options.isotopologue_correction { corrector.name() } else { "disabled" });
    if let (Some(dir), Some(mapping)) = (&options.splitting_dir, &options.splitting_mapping) {
        info!("Splitting tables: {}", dir.display());
        for (site, column) in mapping.iter() {
            info!("  {} -> {}", site, column);
        }
    }

    let result = analyse_rawfile(&args.input, Some(&output), &options, corrector.as_ref())
        .context("Analysis failed")?;

    info!(
        "Wrote {} rows x {} columns to {}",
        result.n_rows(),
        result.n_columns(),
        output.display()
    );
    Ok(())
}

/// Merge config file settings with command-line flags (flags win)
fn build_options(args: &AnalyseArgs, config: &Config) -> AnalysisOptions {
    let mut options = AnalysisOptions::default();

    if let Some(mapper) = config.column_mapper() {
        options.column_mapper = mapper;
    }

    options.drop_columns = if args.drop_columns.is_empty() {
        config.input.drop_columns.clone()
    } else {
        args.drop_columns.clone()
    };
    options.relative_to = args.relative_to.or(config.input.relative_to);

    options.isotopologue_correction =
        !args.no_correction && config.correction.enabled.unwrap_or(true);

    options.splitting_dir = args
        .sites
        .clone()
        .or_else(|| config.splitting.directory.clone());
    options.splitting_mapping = if args.mapping.is_empty() {
        config.site_mapping()
    } else {
        Some(args.mapping.iter().cloned().collect::<SiteMapping>())
    };
    if let Some(prefix) = &config.splitting.percent_prefix {
        options.percent_prefix = prefix.clone();
    }

    options.site_config = if config.splitting.skip_sum_check.unwrap_or(false) {
        SiteFractionConfig::without_sum_check()
    } else {
        match config.splitting.sum_tolerance {
            Some(tolerance) => SiteFractionConfig::default().with_sum_tolerance(Some(tolerance)),
            None => SiteFractionConfig::default(),
        }
    };

    options
}

fn build_corrector(
    args: &AnalyseArgs,
    config: &Config,
    enabled: bool,
) -> Result<Box<dyn IsotopologueCorrector>> {
    let command = args
        .corrector
        .clone()
        .or_else(|| config.correction.command.clone());

    match command {
        Some(command) if enabled => Ok(Box::new(
            ExternalCorrector::new(command).context("Invalid correction command")?,
        )),
        None if enabled => {
            log::warn!(
                "No correction command configured, assuming the input is already corrected"
            );
            Ok(Box::new(NoCorrection))
        }
        _ => Ok(Box::new(NoCorrection)),
    }
}
