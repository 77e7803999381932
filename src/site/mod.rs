//! # Site-Fraction Redistribution
//!
//! A measured isotopologue such as `2C13` can carry its label on different
//! residues of the same molecule. Auxiliary splitting data gives, for every
//! sample/time point, the percentage of the signal attributable to each
//! sub-site. This module turns one isotopologue column into one column per
//! sub-site, scaled by those percentages.
//!
//! ## Inputs
//!
//! - a corrected [`MeasurementTable`](crate::table::MeasurementTable),
//! - [`SiteTables`]: one [`SiteTable`] per site, each keyed like the measurements,
//!   whose percentage columns are marked in files with the `"% "` header prefix,
//! - a [`SiteMapping`] naming which isotopologue column each site table splits.
//!
//! ## Example
//!
//! ```rust
//! use sitefrac::site::{redistribute, SiteMapping, SiteTable, SiteTables};
//! use sitefrac::table::Table;
//!
//! let measurements = Table::new("Time in h", vec![0.into(), 1.into()])?
//!     .with_column("2C13", vec![Some(10.0), Some(20.0)])?;
//!
//! let k1 = SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])?
//!     .with_percentage("siteA", vec![Some(60.0), Some(50.0)])?
//!     .with_percentage("siteB", vec![Some(40.0), Some(50.0)])?;
//!
//! let sites: SiteTables = vec![k1].into_iter().collect();
//! let mapping = SiteMapping::new().with("K1", "2C13");
//!
//! let result = redistribute(&measurements, &sites, &mapping)?;
//! assert_eq!(result.column("2C13 siteA"), Some(&[Some(6.0), Some(10.0)][..]));
//! assert_eq!(result.column("2C13 siteB"), Some(&[Some(4.0), Some(10.0)][..]));
//! assert!(!result.contains_column("2C13"));
//! # Ok::<(), sitefrac::site::SiteFractionError>(())
//! ```

mod error;
mod mapping;
mod redistribute;
mod table;

#[cfg(test)]
mod tests;

pub use error::{DataValidationError, SiteFractionError};
pub use mapping::{parse_assignment, SiteMapping};
pub use redistribute::{
    redistribute, SiteFractionConfig, SiteFractionRedistributor, DEFAULT_SUM_TOLERANCE,
};
pub use table::{SiteColumn, SiteTable, SiteTables, DEFAULT_PERCENT_PREFIX};
