//! # Intensity Tables
//!
//! In-memory representation of isotopologue intensity tables: one row per
//! sample/time key, one named column of intensities per isotopologue label.
//!
//! The same [`Table`] type carries raw measurements, corrected measurements and
//! redistributed results. Transformations never modify their input in place;
//! they return a new table.
//!
//! ```rust
//! use sitefrac::table::Table;
//!
//! let table = Table::new("Time in h", vec![0.into(), 1.into()])?
//!     .with_column("No label", vec![Some(90.0), Some(80.0)])?
//!     .with_column("2C13", vec![Some(10.0), Some(20.0)])?;
//!
//! assert_eq!(table.n_rows(), 2);
//! assert_eq!(table.column("2C13"), Some(&[Some(10.0), Some(20.0)][..]));
//! # Ok::<(), sitefrac::table::TableError>(())
//! ```

mod error;
pub(crate) mod io;
mod key;


use std::collections::{BTreeMap, BTreeSet, HashSet};

pub use error::TableError;
pub use io::Delimiter;
pub use key::SampleKey;

/// Table of raw, corrected or redistributed intensities
pub type MeasurementTable = Table;

/// Table produced by the site-fraction redistribution
pub type ResultTable = Table;

/// A named column of intensities, one value per row (`None` = missing)
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column header
    pub name: String,
    /// Cell values in row order
    pub values: Vec<Option<f64>>,
}

/// Keyed table of floating point intensities
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    key_name: String,
    keys: Vec<SampleKey>,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table with the given key column and no data columns
    ///
    /// Fails if a key occurs more than once.
    pub fn new(key_name: impl Into<String>, keys: Vec<SampleKey>) -> Result<Self, TableError> {
        let mut seen = BTreeSet::new();
        for key in &keys {
            if !seen.insert(key) {
                return Err(TableError::DuplicateKey(key.to_string()));
            }
        }
        Ok(Self {
            key_name: key_name.into(),
            keys,
            columns: Vec::new(),
        })
    }

    /// Builder-style variant of [`Table::push_column`]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, TableError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Append a column at the end of the table
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.contains_column(&name) || name == self.key_name {
            return Err(TableError::DuplicateColumn(name));
        }
        if values.len() != self.keys.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.keys.len(),
                actual: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Name of the key column (e.g. "Time in h")
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Row keys in row order
    pub fn keys(&self) -> &[SampleKey] {
        &self.keys
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.keys.len()
    }

    /// Number of data columns (the key column is not counted)
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Data columns in table order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of the data columns in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Whether a data column with this name exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of a data column
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Map from key to row position
    pub fn row_index(&self) -> BTreeMap<&SampleKey, usize> {
        self.keys.iter().enumerate().map(|(i, k)| (k, i)).collect()
    }

    /// Remove a column and return it
    pub fn remove_column(&mut self, name: &str) -> Result<Column, TableError> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        Ok(self.columns.remove(pos))
    }

    /// Copy of the table without the named columns
    ///
    /// Every name must refer to an existing column.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, TableError> {
        let mut table = self.clone();
        for name in names {
            table.remove_column(name.as_ref())?;
        }
        Ok(table)
    }

    /// Rename data columns, leaving unmatched columns untouched
    pub fn rename_columns<F>(&self, mut rename: F) -> Result<Table, TableError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut seen = HashSet::new();
        let mut table = self.clone();
        for column in &mut table.columns {
            if let Some(new_name) = rename(&column.name) {
                column.name = new_name;
            }
            if !seen.insert(column.name.clone()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(table)
    }

    /// Sort data columns lexically by name
    pub fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Move a column to the first data position
    ///
    /// Returns `false` if the column does not exist.
    pub fn move_column_first(&mut self, name: &str) -> bool {
        match self.columns.iter().position(|c| c.name == name) {
            Some(pos) => {
                let column = self.columns.remove(pos);
                self.columns.insert(0, column);
                true
            }
            None => false,
        }
    }

    /// Largest non-missing value in the table
    pub fn max_value(&self) -> Option<f64> {
        self.columns
            .iter()
            .flat_map(|c| c.values.iter().flatten().copied())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    /// Copy of the table scaled so that its largest value equals `target`
    ///
    /// A table without positive values is returned unchanged.
    pub fn relative_to_max(&self, target: f64) -> Table {
        let mut table = self.clone();
        let max = match self.max_value() {
            Some(m) if m > 0.0 => m,
            _ => {
                log::warn!("No positive intensities, skipping rescaling");
                return table;
            }
        };
        for column in &mut table.columns {
            for value in column.values.iter_mut().flatten() {
                *value = *value / max * target;
            }
        }
        table
    }

    /// Fraction of each row's sum contributed by the selected columns
    ///
    /// The result contains only `columns`, in the given order, and each row
    /// adds up to 1. Missing cells are left out of the row sum and stay
    /// missing; rows whose present values sum to zero become missing.
    pub fn row_percentages<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        let selected = columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column(name)
                    .map(|values| (name, values))
                    .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sums: Vec<Option<f64>> = (0..self.n_rows())
            .map(|row| {
                let sum: f64 = selected.iter().filter_map(|(_, values)| values[row]).sum();
                (sum != 0.0).then_some(sum)
            })
            .collect();

        let mut table = Table {
            key_name: self.key_name.clone(),
            keys: self.keys.clone(),
            columns: Vec::with_capacity(selected.len()),
        };
        for (name, values) in selected {
            let fractions = values
                .iter()
                .zip(&sums)
                .map(|(v, s)| Some((*v)? / (*s)?))
                .collect();
            table.push_column(name, fractions)?;
        }
        Ok(table)
    }
}
