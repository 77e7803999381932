/// Errors that can occur while building, reading or writing tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The file has no header row or no key column
    #[error("Table has no key column")]
    MissingKeyColumn,

    /// A row has an empty sample/time key
    #[error("Row {row} has an empty key")]
    MissingKey {
        /// 1-based data row number
        row: usize,
    },

    /// The same sample/time key occurs twice
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),

    /// Two columns share the same name
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A referenced column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A cell could not be parsed as a number
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        /// 1-based data row number
        row: usize,
        /// Column header
        column: String,
        /// Offending cell text
        value: String,
    },

    /// A column does not have one value per key
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Column name
        column: String,
        /// Number of keys in the table
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
}
