use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::table::io::{is_missing_cell, parse_cell, parse_key, read_raw, RawRecords};
use crate::table::{Delimiter, SampleKey, TableError};

use super::SiteFractionError;

/// Header prefix marking percentage columns in splitting files
pub const DEFAULT_PERCENT_PREFIX: &str = "% ";

/// A column of a site table together with its role
#[derive(Debug, Clone, PartialEq)]
pub enum SiteColumn {
    /// Descriptive column carried along but never used for splitting
    Metadata {
        /// Column header
        name: String,
        /// Cell text (`None` = empty, `NaN` or `NA`)
        values: Vec<Option<String>>,
    },
    /// Share (0-100) of the split isotopologue attributed to one sub-site
    Percentage {
        /// Column header as read
        name: String,
        /// Sub-site name (header without the percentage prefix)
        sub_site: String,
        /// Percentages in row order (`None` = empty)
        values: Vec<Option<f64>>,
    },
}

impl SiteColumn {
    /// Column header
    pub fn name(&self) -> &str {
        match self {
            SiteColumn::Metadata { name, .. } | SiteColumn::Percentage { name, .. } => name,
        }
    }

    /// Whether the cell at `row` is empty
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            SiteColumn::Metadata { values, .. } => values[row].is_none(),
            SiteColumn::Percentage { values, .. } => values[row].is_none(),
        }
    }

    fn len(&self) -> usize {
        match self {
            SiteColumn::Metadata { values, .. } => values.len(),
            SiteColumn::Percentage { values, .. } => values.len(),
        }
    }
}

/// Splitting data for one site: per-key percentages of each sub-site
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTable {
    name: String,
    key_name: String,
    keys: Vec<SampleKey>,
    columns: Vec<SiteColumn>,
}

impl SiteTable {
    /// Create an empty site table
    pub fn new(
        name: impl Into<String>,
        key_name: impl Into<String>,
        keys: Vec<SampleKey>,
    ) -> Result<Self, SiteFractionError> {
        let mut seen = BTreeSet::new();
        for key in &keys {
            if !seen.insert(key) {
                return Err(TableError::DuplicateKey(key.to_string()).into());
            }
        }
        Ok(Self {
            name: name.into(),
            key_name: key_name.into(),
            keys,
            columns: Vec::new(),
        })
    }

    /// Append a column
    pub fn push_column(&mut self, column: SiteColumn) -> Result<(), SiteFractionError> {
        if column.name() == self.key_name || self.columns.iter().any(|c| c.name() == column.name())
        {
            return Err(TableError::DuplicateColumn(column.name().to_string()).into());
        }
        if column.len() != self.keys.len() {
            return Err(TableError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.keys.len(),
                actual: column.len(),
            }
            .into());
        }
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style percentage column, named with [`DEFAULT_PERCENT_PREFIX`]
    pub fn with_percentage(
        mut self,
        sub_site: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, SiteFractionError> {
        let sub_site = sub_site.into();
        self.push_column(SiteColumn::Percentage {
            name: format!("{}{}", DEFAULT_PERCENT_PREFIX, sub_site),
            sub_site,
            values,
        })?;
        Ok(self)
    }

    /// Builder-style metadata column
    pub fn with_metadata(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<Self, SiteFractionError> {
        self.push_column(SiteColumn::Metadata {
            name: name.into(),
            values,
        })?;
        Ok(self)
    }

    /// Read a site table from a CSV/TSV file
    ///
    /// The table is named after the file stem; `key_column` names the column
    /// joined against the measurements and `prefix` marks percentage columns.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        key_column: &str,
        prefix: &str,
    ) -> Result<Self, SiteFractionError> {
        let path = path.as_ref();
        let name = site_name(path);
        let file = File::open(path).map_err(TableError::from)?;
        Self::from_reader(
            name,
            BufReader::new(file),
            Delimiter::from_path(path),
            key_column,
            prefix,
        )
    }

    /// Read a site table from a reader
    pub fn from_reader<R: Read>(
        name: impl Into<String>,
        reader: R,
        delimiter: Delimiter,
        key_column: &str,
        prefix: &str,
    ) -> Result<Self, SiteFractionError> {
        let name = name.into();
        let RawRecords { headers, records } = read_raw(reader, delimiter)?;

        let key_pos = headers
            .iter()
            .position(|h| h == key_column)
            .ok_or_else(|| SiteFractionError::MissingKeyColumn {
                site: name.clone(),
                key: key_column.to_string(),
            })?;

        let keys = records
            .iter()
            .enumerate()
            .map(|(i, record)| parse_key(record.get(key_pos).unwrap_or(""), i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let mut table = SiteTable::new(name, key_column, keys)?;

        for (pos, header) in headers.iter().enumerate() {
            if pos == key_pos {
                continue;
            }
            let cells = records.iter().map(|r| r.get(pos).unwrap_or(""));
            let column = match header.strip_prefix(prefix) {
                Some(sub_site) if !prefix.is_empty() && !sub_site.is_empty() => {
                    SiteColumn::Percentage {
                        name: header.clone(),
                        sub_site: sub_site.to_string(),
                        values: cells
                            .enumerate()
                            .map(|(i, cell)| parse_cell(cell, i + 1, header))
                            .collect::<Result<Vec<_>, _>>()?,
                    }
                }
                _ => SiteColumn::Metadata {
                    name: header.clone(),
                    values: cells
                        .map(|cell| (!is_missing_cell(cell)).then(|| cell.trim().to_string()))
                        .collect(),
                },
            };
            table.push_column(column)?;
        }

        log::debug!(
            "Read site table '{}' with {} rows and {} percentage columns",
            table.name,
            table.n_rows(),
            table.percentage_columns().count()
        );
        Ok(table)
    }

    /// Site identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the key column joined against the measurements
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

    /// All non-key columns in file order
    pub fn columns(&self) -> &[SiteColumn] {
        &self.columns
    }

    /// Percentage columns as `(header, sub_site, values)`
    pub fn percentage_columns(&self) -> impl Iterator<Item = (&str, &str, &[Option<f64>])> {
        self.columns.iter().filter_map(|c| match c {
            SiteColumn::Percentage {
                name,
                sub_site,
                values,
            } => Some((name.as_str(), sub_site.as_str(), values.as_slice())),
            SiteColumn::Metadata { .. } => None,
        })
    }

    /// Map from key to row position
    pub fn row_index(&self) -> BTreeMap<&SampleKey, usize> {
        self.keys.iter().enumerate().map(|(i, k)| (k, i)).collect()
    }
}

/// Named collection of site tables (one per splitting sheet)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTables {
    tables: BTreeMap<String, SiteTable>,
}

impl SiteTables {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under its own name, replacing any table of the same name
    pub fn insert(&mut self, table: SiteTable) -> Option<SiteTable> {
        self.tables.insert(table.name().to_string(), table)
    }

    /// Table for a site identifier
    pub fn get(&self, site: &str) -> Option<&SiteTable> {
        self.tables.get(site)
    }

    /// Site identifiers in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Read every `.csv`, `.tsv` and `.txt` file of a directory as a site table
    pub fn from_dir<P: AsRef<Path>>(
        dir: P,
        key_column: &str,
        prefix: &str,
    ) -> Result<Self, SiteFractionError> {
        Self::load_dir(dir.as_ref(), key_column, prefix, |_| true)
    }

    /// Read only the site tables named in `sites` from a directory
    ///
    /// Other files are left unread, so unrelated sheets (summaries, notes)
    /// may sit next to the splitting tables. Named sites without a file are
    /// not an error here; the redistribution reports them.
    pub fn from_dir_for_sites<'a, P, I>(
        dir: P,
        key_column: &str,
        prefix: &str,
        sites: I,
    ) -> Result<Self, SiteFractionError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = sites.into_iter().collect();
        Self::load_dir(dir.as_ref(), key_column, prefix, |name| {
            wanted.contains(name)
        })
    }

    fn load_dir<F>(
        dir: &Path,
        key_column: &str,
        prefix: &str,
        wanted: F,
    ) -> Result<Self, SiteFractionError>
    where
        F: Fn(&str) -> bool,
    {
        let mut paths = fs::read_dir(dir)
            .map_err(TableError::from)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(TableError::from)?;
        paths.sort();

        let mut tables = Self::new();
        let mut seen = HashSet::new();
        for path in paths.into_iter().filter(|p| is_table_file(p)) {
            if !wanted(&site_name(&path)) {
                log::debug!("Skipping unmapped file {}", path.display());
                continue;
            }
            let table = SiteTable::from_path(&path, key_column, prefix)?;
            if !seen.insert(table.name().to_string()) {
                log::warn!(
                    "Site table '{}' defined more than once, using {}",
                    table.name(),
                    path.display()
                );
            }
            tables.insert(table);
        }

        if tables.is_empty() {
            log::warn!("No site tables found in {}", dir.display());
        }
        Ok(tables)
    }
}

impl FromIterator<SiteTable> for SiteTables {
    fn from_iter<I: IntoIterator<Item = SiteTable>>(iter: I) -> Self {
        let mut tables = Self::new();
        for table in iter {
            tables.insert(table);
        }
        tables
    }
}

fn site_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_table_file(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .as_deref(),
            Some("csv") | Some("tsv") | Some("txt")
        )
}
