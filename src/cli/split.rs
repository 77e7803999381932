use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use sitefrac::site::{SiteFractionConfig, SiteFractionRedistributor, SiteMapping, SiteTables};
use sitefrac::table::{Delimiter, Table};

/// Split isotopologue columns of an already corrected table by site
pub fn run(
    measurements: PathBuf,
    sites: PathBuf,
    mapping: Vec<(String, String)>,
    output: Option<PathBuf>,
    tolerance: Option<f64>,
    no_sum_check: bool,
    prefix: String,
) -> Result<()> {
    if !measurements.exists() {
        anyhow::bail!("Input file does not exist: {}", measurements.display());
    }
    if mapping.is_empty() {
        log::warn!("No --map given, columns are only reordered");
    }

    let table = Table::from_path(&measurements)
        .with_context(|| format!("Failed to read {}", measurements.display()))?;
    let mapping: SiteMapping = mapping.into_iter().collect();
    let site_tables = SiteTables::from_dir_for_sites(
        &sites,
        table.key_name(),
        &prefix,
        mapping.iter().map(|(site, _)| site),
    )
    .with_context(|| format!("Failed to read site tables from {}", sites.display()))?;
    info!(
        "Loaded {} site tables: {}",
        site_tables.len(),
        site_tables.names().collect::<Vec<_>>().join(", ")
    );

    let config = if no_sum_check {
        SiteFractionConfig::without_sum_check()
    } else {
        match tolerance {
            Some(t) => SiteFractionConfig::default().with_sum_tolerance(Some(t)),
            None => SiteFractionConfig::default(),
        }
    };

    let result = SiteFractionRedistributor::new(config)
        .redistribute_to(&table, &site_tables, &mapping, output.as_deref())
        .context("Site-fraction redistribution failed")?;

    if output.is_none() {
        result.to_writer(std::io::stdout().lock(), Delimiter::Comma)?;
    }
    Ok(())
}
