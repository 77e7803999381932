use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};

use crate::labels::NO_LABEL;
use crate::table::{MeasurementTable, ResultTable, Table};

use super::{DataValidationError, SiteFractionError, SiteMapping, SiteTable, SiteTables};

/// Allowed deviation of a row's sub-site percentages from 100, in percentage points
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.01;

// Float slack on the tolerance comparison
const SUM_EPSILON: f64 = 1e-9;

/// Settings of the site-fraction redistribution
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFractionConfig {
    /// Maximum deviation of each row's percentage sum from 100, inclusive
    /// (`None` disables the check)
    pub sum_tolerance: Option<f64>,

    /// Column moved to the front of the result, if present
    pub leading_column: String,
}

impl Default for SiteFractionConfig {
    fn default() -> Self {
        Self {
            sum_tolerance: Some(DEFAULT_SUM_TOLERANCE),
            leading_column: NO_LABEL.to_string(),
        }
    }
}

impl SiteFractionConfig {
    /// Configuration that trusts the percentages to add up to 100
    pub fn without_sum_check() -> Self {
        Self {
            sum_tolerance: None,
            ..Default::default()
        }
    }

    /// Set the percentage-sum tolerance
    pub fn with_sum_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.sum_tolerance = tolerance;
        self
    }
}

/// Splits isotopologue intensities across sub-residue sites
///
/// Each isotopologue column named in a [`SiteMapping`] is replaced by one
/// column per percentage column of its [`SiteTable`], holding
/// `intensity * percentage / 100`. Site rows are matched to measurement rows
/// by key, never by position.
#[derive(Debug, Clone, Default)]
pub struct SiteFractionRedistributor {
    config: SiteFractionConfig,
}

impl SiteFractionRedistributor {
    /// Create a redistributor with the given settings
    pub fn new(config: SiteFractionConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &SiteFractionConfig {
        &self.config
    }

    /// Redistribute and, if `destination` is given, write the result as CSV
    ///
    /// Nothing is written when redistribution fails.
    pub fn redistribute_to(
        &self,
        measurements: &MeasurementTable,
        site_tables: &SiteTables,
        mapping: &SiteMapping,
        destination: Option<&Path>,
    ) -> Result<ResultTable, SiteFractionError> {
        let result = self.redistribute(measurements, site_tables, mapping)?;
        if let Some(path) = destination {
            info!("Saving {}", path.display());
            result.write_csv(path)?;
        }
        Ok(result)
    }

    /// Replace every mapped isotopologue column by its per-site columns
    pub fn redistribute(
        &self,
        measurements: &MeasurementTable,
        site_tables: &SiteTables,
        mapping: &SiteMapping,
    ) -> Result<ResultTable, SiteFractionError> {
        self.validate_mapping(measurements, site_tables, mapping)?;

        let mut result = measurements.clone();
        for (site, column) in mapping.iter() {
            // validated above
            let site_table = site_tables
                .get(site)
                .ok_or_else(|| SiteFractionError::UnknownSite(site.to_string()))?;
            self.split_column(&mut result, site_table, column)?;
        }

        result.sort_columns();
        result.move_column_first(&self.config.leading_column);
        Ok(result)
    }

    /// Check the mapping against the supplied tables before touching any data
    fn validate_mapping(
        &self,
        measurements: &MeasurementTable,
        site_tables: &SiteTables,
        mapping: &SiteMapping,
    ) -> Result<(), SiteFractionError> {
        let mut split_columns = HashSet::new();
        for (site, column) in mapping.iter() {
            let site_table = site_tables
                .get(site)
                .ok_or_else(|| SiteFractionError::UnknownSite(site.to_string()))?;

            if !measurements.contains_column(column) {
                return Err(SiteFractionError::UnknownColumn {
                    site: site.to_string(),
                    column: column.to_string(),
                });
            }
            if !split_columns.insert(column) {
                return Err(SiteFractionError::ColumnMappedTwice(column.to_string()));
            }
            if site_table.key_name() != measurements.key_name() {
                return Err(SiteFractionError::MissingKeyColumn {
                    site: site.to_string(),
                    key: measurements.key_name().to_string(),
                });
            }
            if site_table.percentage_columns().next().is_none() {
                return Err(SiteFractionError::NoPercentageColumns(site.to_string()));
            }
        }
        Ok(())
    }

    fn split_column(
        &self,
        result: &mut Table,
        site_table: &SiteTable,
        column: &str,
    ) -> Result<(), SiteFractionError> {
        let site_rows = align_rows(result, site_table)?;
        check_missing(result, site_table, &site_rows)?;
        self.check_percentages(result, site_table, &site_rows)?;

        let intensities = result
            .column(column)
            .ok_or_else(|| SiteFractionError::UnknownColumn {
                site: site_table.name().to_string(),
                column: column.to_string(),
            })?
            .to_vec();

        info!(
            "Splitting '{}' by site table '{}' into {} columns",
            column,
            site_table.name(),
            site_table.percentage_columns().count()
        );

        for (_, sub_site, percentages) in site_table.percentage_columns() {
            let site_column = format!("{} {}", column, sub_site);
            if result.contains_column(&site_column) {
                return Err(SiteFractionError::DerivedColumnExists(site_column));
            }
            let values = intensities
                .iter()
                .zip(&site_rows)
                .map(|(intensity, &site_row)| Some((*intensity)? * percentages[site_row]? / 100.0))
                .collect();
            debug!("Adding column '{}'", site_column);
            result.push_column(site_column, values)?;
        }

        result.remove_column(column)?;
        Ok(())
    }

    fn check_percentages(
        &self,
        result: &Table,
        site_table: &SiteTable,
        site_rows: &[usize],
    ) -> Result<(), SiteFractionError> {
        for (key, &site_row) in result.keys().iter().zip(site_rows) {
            let mut sum = 0.0;
            for (name, _, values) in site_table.percentage_columns() {
                let value = values[site_row].unwrap_or(0.0);
                if !(0.0..=100.0).contains(&value) {
                    return Err(DataValidationError::PercentageOutOfRange {
                        site: site_table.name().to_string(),
                        column: name.to_string(),
                        key: key.to_string(),
                        value,
                    }
                    .into());
                }
                sum += value;
            }

            if let Some(tolerance) = self.config.sum_tolerance {
                if (sum - 100.0).abs() > tolerance + SUM_EPSILON {
                    return Err(DataValidationError::PercentageSum {
                        site: site_table.name().to_string(),
                        key: key.to_string(),
                        sum,
                        tolerance,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Site table row for every result row, failing on any key present on one side only
fn align_rows(result: &Table, site_table: &SiteTable) -> Result<Vec<usize>, SiteFractionError> {
    let site_index = site_table.row_index();
    let result_index = result.row_index();

    let missing_in_site: Vec<String> = result
        .keys()
        .iter()
        .filter(|k| !site_index.contains_key(k))
        .map(|k| k.to_string())
        .collect();
    let missing_in_measurements: Vec<String> = site_table
        .keys()
        .iter()
        .filter(|k| !result_index.contains_key(k))
        .map(|k| k.to_string())
        .collect();

    if !missing_in_site.is_empty() || !missing_in_measurements.is_empty() {
        return Err(DataValidationError::KeyMismatch {
            site: site_table.name().to_string(),
            missing_in_site,
            missing_in_measurements,
        }
        .into());
    }

    Ok(result.keys().iter().map(|k| site_index[k]).collect())
}

/// Fail on the first empty cell of the joined measurement and site rows
fn check_missing(
    result: &Table,
    site_table: &SiteTable,
    site_rows: &[usize],
) -> Result<(), SiteFractionError> {
    let missing = |column: &str, row: usize| DataValidationError::MissingValue {
        site: site_table.name().to_string(),
        column: column.to_string(),
        key: result.keys()[row].to_string(),
    };

    for (row, &site_row) in site_rows.iter().enumerate() {
        if let Some(column) = result.columns().iter().find(|c| c.values[row].is_none()) {
            return Err(missing(&column.name, row).into());
        }
        if let Some(column) = site_table.columns().iter().find(|c| c.is_missing(site_row)) {
            return Err(missing(column.name(), row).into());
        }
    }
    Ok(())
}

/// Redistribute with the default settings
///
/// See [`SiteFractionRedistributor::redistribute`].
pub fn redistribute(
    measurements: &MeasurementTable,
    site_tables: &SiteTables,
    mapping: &SiteMapping,
) -> Result<ResultTable, SiteFractionError> {
    SiteFractionRedistributor::default().redistribute(measurements, site_tables, mapping)
}
