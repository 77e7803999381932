//! # Raw File Analysis
//!
//! End-to-end processing of one instrument export:
//!
//! 1. parse the raw table and substitute isotopologue labels for raw column names,
//! 2. drop bookkeeping columns and optionally rescale relative to the largest peak,
//! 3. run the isotopologue correction,
//! 4. split isotopologue columns by site when splitting tables and a mapping are given,
//! 5. write the result as CSV.

mod error;


use std::path::{Path, PathBuf};

use log::info;

pub use error::AnalysisError;

use crate::correction::IsotopologueCorrector;
use crate::labels::ColumnMapper;
use crate::site::{
    SiteFractionConfig, SiteFractionRedistributor, SiteMapping, SiteTables, DEFAULT_PERCENT_PREFIX,
};
use crate::table::{MeasurementTable, ResultTable, Table};

/// Options controlling [`analyse_rawfile`]
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Raw column name to isotopologue label substitution
    pub column_mapper: ColumnMapper,

    /// Columns removed right after loading (e.g. "compound", "replicate")
    ///
    /// [`analyse_rawfile`] leaves them out while reading, matching raw
    /// headers, so they may hold text.
    pub drop_columns: Vec<String>,

    /// Rescale so that the largest intensity equals this value
    pub relative_to: Option<f64>,

    /// Whether to run the isotopologue corrector
    pub isotopologue_correction: bool,

    /// Directory holding one splitting table per site
    pub splitting_dir: Option<PathBuf>,

    /// Site table to isotopologue column assignment
    pub splitting_mapping: Option<SiteMapping>,

    /// Header prefix of percentage columns in splitting tables
    pub percent_prefix: String,

    /// Redistribution settings
    pub site_config: SiteFractionConfig,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            column_mapper: ColumnMapper::kac_peptide(),
            drop_columns: Vec::new(),
            relative_to: None,
            isotopologue_correction: true,
            splitting_dir: None,
            splitting_mapping: None,
            percent_prefix: DEFAULT_PERCENT_PREFIX.to_string(),
            site_config: SiteFractionConfig::default(),
        }
    }
}

impl AnalysisOptions {
    /// Splitting directory and mapping, failing if only one of them is set
    ///
    /// An empty mapping counts as unset.
    pub fn splitting(&self) -> Result<Option<(&Path, &SiteMapping)>, AnalysisError> {
        let mapping = self.splitting_mapping.as_ref().filter(|m| !m.is_empty());
        match (self.splitting_dir.as_deref(), mapping) {
            (Some(dir), Some(mapping)) => Ok(Some((dir, mapping))),
            (None, None) => Ok(None),
            _ => Err(incomplete_splitting()),
        }
    }
}

/// Parse, correct and optionally split a raw measurement file
///
/// The result is written to `outfile` when given and always returned.
pub fn analyse_rawfile(
    infile: &Path,
    outfile: Option<&Path>,
    options: &AnalysisOptions,
    corrector: &dyn IsotopologueCorrector,
) -> Result<ResultTable, AnalysisError> {
    let splitting = options.splitting()?;

    info!("Reading {}", infile.display());
    let raw = Table::from_path_skipping(infile, &options.drop_columns)?;
    let labelled = options.column_mapper.apply(&raw)?;

    let site_tables = match splitting {
        Some((dir, mapping)) => Some(SiteTables::from_dir_for_sites(
            dir,
            labelled.key_name(),
            &options.percent_prefix,
            mapping.iter().map(|(site, _)| site),
        )?),
        None => None,
    };

    let result = process(&labelled, site_tables.as_ref(), &[], options, corrector)?;

    if let Some(path) = outfile {
        info!("Saving {}", path.display());
        result.write_csv(path)?;
    }
    Ok(result)
}

/// Read a raw measurement file and substitute isotopologue labels
pub fn parse_ms_data(infile: &Path, mapper: &ColumnMapper) -> Result<MeasurementTable, AnalysisError> {
    let table = Table::from_path(infile)?;
    Ok(mapper.apply(&table)?)
}

/// In-memory part of [`analyse_rawfile`] for an already labelled table
///
/// `site_tables` stands in for the splitting directory of `options`.
pub fn analyse_table(
    labelled: &MeasurementTable,
    site_tables: Option<&SiteTables>,
    options: &AnalysisOptions,
    corrector: &dyn IsotopologueCorrector,
) -> Result<ResultTable, AnalysisError> {
    process(labelled, site_tables, &options.drop_columns, options, corrector)
}

fn process(
    labelled: &MeasurementTable,
    site_tables: Option<&SiteTables>,
    drop_columns: &[String],
    options: &AnalysisOptions,
    corrector: &dyn IsotopologueCorrector,
) -> Result<ResultTable, AnalysisError> {
    let mapping = options.splitting_mapping.as_ref().filter(|m| !m.is_empty());
    if site_tables.is_some() != mapping.is_some() {
        return Err(incomplete_splitting());
    }

    let mut table = labelled.drop_columns(drop_columns)?;
    if let Some(target) = options.relative_to {
        info!("Rescaling intensities relative to the largest peak ({})", target);
        table = table.relative_to_max(target);
    }

    if options.isotopologue_correction {
        info!("Isotopologue correction with '{}'", corrector.name());
        table = corrector.correct(&table)?;
    }

    if let (Some(site_tables), Some(mapping)) = (site_tables, mapping) {
        let redistributor = SiteFractionRedistributor::new(options.site_config.clone());
        table = redistributor.redistribute(&table, site_tables, mapping)?;
    }

    Ok(table)
}

fn incomplete_splitting() -> AnalysisError {
    AnalysisError::Validation(
        "both splitting tables and splitting mapping have to be set".to_string(),
    )
}
