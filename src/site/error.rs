use crate::table::TableError;

/// Measurement and splitting data do not fit together
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataValidationError {
    /// Some keys are present on one side of the join only
    #[error(
        "Keys of site table '{site}' do not match the measurements \
         (missing in site table: {missing_in_site:?}, missing in measurements: {missing_in_measurements:?})"
    )]
    KeyMismatch {
        /// Site table identifier
        site: String,
        /// Measurement keys without a site row
        missing_in_site: Vec<String>,
        /// Site keys without a measurement row
        missing_in_measurements: Vec<String>,
    },

    /// A joined cell is empty
    #[error("Missing value in column '{column}' for key '{key}' while joining site table '{site}'")]
    MissingValue {
        /// Site table identifier
        site: String,
        /// Column holding the missing value
        column: String,
        /// Row key
        key: String,
    },

    /// A percentage lies outside [0, 100]
    #[error("Percentage {value} in column '{column}' of site table '{site}' is outside [0, 100] for key '{key}'")]
    PercentageOutOfRange {
        /// Site table identifier
        site: String,
        /// Percentage column header
        column: String,
        /// Row key
        key: String,
        /// Offending value
        value: f64,
    },

    /// The sub-site percentages of a row do not add up to 100
    #[error("Percentages of site table '{site}' sum to {sum} for key '{key}' (tolerance {tolerance})")]
    PercentageSum {
        /// Site table identifier
        site: String,
        /// Row key
        key: String,
        /// Actual row sum
        sum: f64,
        /// Allowed deviation from 100
        tolerance: f64,
    },
}

/// Errors that can occur during site-fraction redistribution
#[derive(Debug, thiserror::Error)]
pub enum SiteFractionError {
    /// The mapping names a site table that was not supplied
    #[error("Site table '{0}' referenced by the mapping was not supplied")]
    UnknownSite(String),

    /// The mapping names a column the measurements do not have
    #[error("Column '{column}' mapped to site table '{site}' is not in the measurements")]
    UnknownColumn {
        /// Site table identifier
        site: String,
        /// Missing measurement column
        column: String,
    },

    /// Two site tables would split the same column
    #[error("Column '{0}' is mapped to more than one site table")]
    ColumnMappedTwice(String),

    /// A site table lacks the key column used by the measurements
    #[error("Site table '{site}' has no key column '{key}'")]
    MissingKeyColumn {
        /// Site table identifier
        site: String,
        /// Expected key column name
        key: String,
    },

    /// A site table has nothing to split by
    #[error("Site table '{0}' has no percentage columns")]
    NoPercentageColumns(String),

    /// A derived site column would overwrite an existing column
    #[error("Derived column '{0}' already exists")]
    DerivedColumnExists(String),

    /// Joined data failed validation
    #[error("Data validation failed: {0}")]
    DataValidation(#[from] DataValidationError),

    /// Table construction, reading or writing failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl SiteFractionError {
    /// Whether the error comes from an inconsistent mapping configuration
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            SiteFractionError::UnknownSite(_)
                | SiteFractionError::UnknownColumn { .. }
                | SiteFractionError::ColumnMappedTwice(_)
                | SiteFractionError::MissingKeyColumn { .. }
                | SiteFractionError::NoPercentageColumns(_)
        )
    }
}
