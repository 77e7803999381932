use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use super::{SampleKey, Table, TableError};

/// Field separator of a delimited table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Comma separated values
    #[default]
    Comma,
    /// Tab separated values
    Tab,
}

impl Delimiter {
    /// Guess the delimiter from a file extension (`.tsv`/`.txt` are tab separated)
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("txt") | Some("tab") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Header and records of a delimited file, read as text
pub(crate) struct RawRecords {
    pub headers: Vec<String>,
    pub records: Vec<csv::StringRecord>,
}

pub(crate) fn read_raw<R: Read>(reader: R, delimiter: Delimiter) -> Result<RawRecords, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|s| s.to_string())
        .collect();
    if headers.is_empty() {
        return Err(TableError::MissingKeyColumn);
    }

    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(RawRecords { headers, records })
}

/// Whether a cell holds no value (empty, `NaN` or `NA`)
pub(crate) fn is_missing_cell(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case("nan") || text.eq_ignore_ascii_case("na")
}

/// Parse an intensity cell; missing cells become `None`
pub(crate) fn parse_cell(text: &str, row: usize, column: &str) -> Result<Option<f64>, TableError> {
    if is_missing_cell(text) {
        return Ok(None);
    }
    let text = text.trim();
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| TableError::InvalidValue {
            row,
            column: column.to_string(),
            value: text.to_string(),
        })
}

/// Parse a key cell; empty keys are rejected
pub(crate) fn parse_key(text: &str, row: usize) -> Result<SampleKey, TableError> {
    if text.trim().is_empty() {
        return Err(TableError::MissingKey { row });
    }
    Ok(SampleKey::new(text))
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Table {
    /// Read a table from a CSV/TSV file whose first column holds the row keys
    ///
    /// The delimiter is chosen from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), Delimiter::from_path(path))
    }

    /// Read a table from a file, leaving out the named data columns
    ///
    /// Skipped columns are never parsed, so they may hold text.
    pub fn from_path_skipping<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        skip: &[S],
    ) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader_skipping(BufReader::new(file), Delimiter::from_path(path), skip)
    }

    /// Read a table from a reader whose first column holds the row keys
    pub fn from_reader<R: Read>(reader: R, delimiter: Delimiter) -> Result<Self, TableError> {
        Self::from_reader_skipping::<R, &str>(reader, delimiter, &[])
    }

    /// Read a table from a reader, leaving out the named data columns
    ///
    /// Every name in `skip` must be a data column header.
    pub fn from_reader_skipping<R: Read, S: AsRef<str>>(
        reader: R,
        delimiter: Delimiter,
        skip: &[S],
    ) -> Result<Self, TableError> {
        let RawRecords { headers, records } = read_raw(reader, delimiter)?;

        if let Some(unknown) = skip
            .iter()
            .map(|name| name.as_ref())
            .find(|name| !headers[1..].iter().any(|h| h == *name))
        {
            return Err(TableError::ColumnNotFound(unknown.to_string()));
        }
        let kept: Vec<usize> = (1..headers.len())
            .filter(|&pos| !skip.iter().any(|name| name.as_ref() == headers[pos]))
            .collect();

        let mut keys = Vec::with_capacity(records.len());
        let mut values: Vec<Vec<Option<f64>>> =
            vec![Vec::with_capacity(records.len()); kept.len()];

        for (i, record) in records.iter().enumerate() {
            let row = i + 1;
            keys.push(parse_key(record.get(0).unwrap_or(""), row)?);
            for (&pos, column_values) in kept.iter().zip(values.iter_mut()) {
                let cell = record.get(pos).unwrap_or("");
                column_values.push(parse_cell(cell, row, &headers[pos])?);
            }
        }

        let mut table = Table::new(headers[0].clone(), keys)?;
        for (&pos, column_values) in kept.iter().zip(values) {
            table.push_column(headers[pos].clone(), column_values)?;
        }
        if !skip.is_empty() {
            log::debug!("Skipped {} columns while reading", skip.len());
        }

        log::debug!(
            "Read table with {} rows and {} columns keyed by '{}'",
            table.n_rows(),
            table.n_columns(),
            table.key_name()
        );
        Ok(table)
    }

    /// Write the table as CSV, key column first
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.to_writer(file, Delimiter::from_path(path))
    }

    /// Write the table to any writer
    pub fn to_writer<W: Write>(&self, writer: W, delimiter: Delimiter) -> Result<(), TableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(writer);

        let mut header = Vec::with_capacity(self.n_columns() + 1);
        header.push(self.key_name().to_string());
        header.extend(self.column_names().map(str::to_string));
        csv_writer.write_record(&header)?;

        for (row, key) in self.keys().iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(key.as_str().to_string());
            record.extend(self.columns().iter().map(|c| format_cell(c.values[row])));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string
    pub fn to_csv_string(&self) -> Result<String, TableError> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer, Delimiter::Comma)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
