use crate::correction::CorrectionError;
use crate::site::SiteFractionError;
use crate::table::TableError;

/// Errors that can occur while analysing a raw measurement file
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Incompatible analysis options
    #[error("Invalid options: {0}")]
    Validation(String),

    /// Reading, transforming or writing a table failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// The isotopologue corrector failed
    #[error("Isotopologue correction failed: {0}")]
    Correction(#[from] CorrectionError),

    /// Site-fraction redistribution failed
    #[error("Site-fraction redistribution failed: {0}")]
    SiteFraction(#[from] SiteFractionError),
}
