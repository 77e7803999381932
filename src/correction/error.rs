use crate::table::TableError;

/// Errors that can occur while running an isotopologue correction
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    /// I/O error preparing or collecting the correction files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No program configured for the external corrector
    #[error("Correction command is empty")]
    EmptyCommand,

    /// The correction program could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The correction program exited unsuccessfully
    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        /// Program name
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The table could not be written for, or read back from, the corrector
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
