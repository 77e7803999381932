//! Mapping from raw instrument column names to isotopologue labels.
//!
//! Instrument exports name each column after the measured peptide or
//! metabolite variant (e.g. `K(ac)QLATK(ac13C)AAR`). Downstream steps work on
//! short isotopologue labels such as `2C13`, so the raw names are substituted
//! through a fixed lookup table right after loading.

use std::collections::HashMap;

use crate::table::{Table, TableError};

/// Label of the unlabelled isotopologue, placed first in result tables
pub const NO_LABEL: &str = "No label";

/// Built-in column map for the doubly acetylated `K(ac)QLATK(ac)AAR` peptide
pub const KAC_PEPTIDE_LABELS: &[(&str, &str)] = &[
    ("K(ac)QLATK(ac)AAR", NO_LABEL),
    ("K(ac)QLATK(ac13C)AAR", "2C13"),
    ("K(ac)QLATK(ac*)AAR", "2C13 3H02"),
    ("K(ac13C)QLATK(ac13C)AAR", "4C13"),
    ("K(ac13C)QLATK(ac*)AAR", "4C13 3H02"),
    ("K(ac*)QLATK(ac*)AAR", "4C13 6H02"),
];

/// Raw column name to isotopologue label substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapper {
    labels: HashMap<String, String>,
}

impl ColumnMapper {
    /// Create an empty mapper (renames nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper for the `K(ac)QLATK(ac)AAR` peptide columns
    pub fn kac_peptide() -> Self {
        KAC_PEPTIDE_LABELS.iter().copied().collect()
    }

    /// Add or replace a substitution
    pub fn insert(&mut self, raw: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(raw.into(), label.into());
    }

    /// Label for a raw column name, if one is defined
    pub fn label(&self, raw: &str) -> Option<&str> {
        self.labels.get(raw).map(String::as_str)
    }

    /// Number of substitutions
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the mapper renames nothing
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rename the columns of a table; unknown columns keep their name
    pub fn apply(&self, table: &Table) -> Result<Table, TableError> {
        let unmapped: Vec<&str> = table
            .column_names()
            .filter(|name| self.label(name).is_none())
            .collect();
        if !self.is_empty() && !unmapped.is_empty() {
            log::debug!("Columns without a label mapping: {:?}", unmapped);
        }
        table.rename_columns(|name| self.label(name).map(str::to_string))
    }
}

impl<R: Into<String>, L: Into<String>> FromIterator<(R, L)> for ColumnMapper {
    fn from_iter<I: IntoIterator<Item = (R, L)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(raw, label)| (raw.into(), label.into()))
                .collect(),
        }
    }
}
