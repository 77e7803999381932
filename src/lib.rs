//! # sitefrac - Isotopologue Site-Fraction Post-Processing
//!
//! `sitefrac` post-processes mass spectrometry peak-intensity tables from
//! isotope tracing experiments. It turns an instrument export into a
//! normalized, site-resolved CSV table.
//!
//! ## Key Features
//!
//! - **Label Mapping**: Raw peptide/metabolite column names are replaced by
//!   canonical isotopologue labels ("No label", "2C13", "4C13 3H02", ...).
//!
//! - **Correction Hand-off**: Natural-abundance isotopologue correction is
//!   delegated to an external tool through the [`correction::IsotopologueCorrector`]
//!   trait.
//!
//! - **Site Redistribution**: Corrected isotopologue intensities are split
//!   across sub-residue sites using per-sample percentage tables, with explicit
//!   key alignment and percentage checks.
//!
//! - **Normalization Helpers**: Row percentages, rescaling relative to the
//!   largest peak, column dropping and reordering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sitefrac::correction::NoCorrection;
//! use sitefrac::pipeline::{analyse_rawfile, AnalysisOptions};
//! use sitefrac::site::SiteMapping;
//!
//! let options = AnalysisOptions {
//!     isotopologue_correction: false,
//!     splitting_dir: Some("sites".into()),
//!     splitting_mapping: Some(SiteMapping::new().with("K1", "2C13")),
//!     ..Default::default()
//! };
//!
//! let result = analyse_rawfile(
//!     Path::new("raw.csv"),
//!     Some(Path::new("result.csv")),
//!     &options,
//!     &NoCorrection,
//! )?;
//! println!("{} rows, {} columns", result.n_rows(), result.n_columns());
//! # Ok::<(), sitefrac::pipeline::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`table`]: keyed intensity tables and CSV/TSV I/O
//! - [`labels`]: raw column name to isotopologue label mapping
//! - [`correction`]: isotopologue correction seam
//! - [`site`]: site tables, site mapping and the redistribution itself
//! - [`pipeline`]: end-to-end processing of one raw file

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod correction;
pub mod labels;
pub mod pipeline;
pub mod site;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::correction::{
        CorrectionError, ExternalCorrector, IsotopologueCorrector, NoCorrection,
    };
    pub use crate::labels::{ColumnMapper, NO_LABEL};
    pub use crate::pipeline::{analyse_rawfile, analyse_table, AnalysisError, AnalysisOptions};
    pub use crate::site::{
        redistribute, DataValidationError, SiteFractionConfig, SiteFractionError,
        SiteFractionRedistributor, SiteMapping, SiteTable, SiteTables,
    };
    pub use crate::table::{MeasurementTable, ResultTable, SampleKey, Table, TableError};
}
