//! # Isotopologue Correction
//!
//! Natural-abundance correction is performed by an external routine; this
//! crate only hands the renamed table over and takes the corrected table
//! back. [`IsotopologueCorrector`] is the seam: [`NoCorrection`] passes data
//! through untouched and [`ExternalCorrector`] runs a command-line tool on a
//! temporary CSV file.

mod error;
mod external;

pub use error::CorrectionError;
pub use external::{ExternalCorrector, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};

use crate::table::MeasurementTable;

/// Removes natural-abundance isotope contributions from a measurement table
pub trait IsotopologueCorrector {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Return the corrected table; the input is left untouched
    fn correct(&self, table: &MeasurementTable) -> Result<MeasurementTable, CorrectionError>;
}

/// Pass-through corrector for data that is already corrected
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrection;

impl IsotopologueCorrector for NoCorrection {
    fn name(&self) -> &str {
        "none"
    }

    fn correct(&self, table: &MeasurementTable) -> Result<MeasurementTable, CorrectionError> {
        Ok(table.clone())
    }
}

impl<C: IsotopologueCorrector + ?Sized> IsotopologueCorrector for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn correct(&self, table: &MeasurementTable) -> Result<MeasurementTable, CorrectionError> {
        (**self).correct(table)
    }
}
