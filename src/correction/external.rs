use std::process::Command;

use log::{debug, info};

use super::{CorrectionError, IsotopologueCorrector};
use crate::table::{Delimiter, MeasurementTable, Table};

/// Argument placeholder replaced by the path of the table handed to the tool
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Argument placeholder replaced by the path the tool must write its result to
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs an external correction tool on a temporary CSV copy of the table
///
/// The table is written to a temporary directory and the command is run with
/// [`INPUT_PLACEHOLDER`] and [`OUTPUT_PLACEHOLDER`] substituted in its
/// arguments. Without an output placeholder the corrected CSV is read from
/// the tool's standard output.
///
/// ```rust,no_run
/// use sitefrac::correction::{ExternalCorrector, IsotopologueCorrector};
/// # use sitefrac::table::Table;
/// # let table = Table::new("Time in h", vec![0.into()]).unwrap();
///
/// let picor = ExternalCorrector::new(vec![
///     "picor".to_string(),
///     "{input}".to_string(),
///     "K(ac)QLATK(ac)AAR".to_string(),
///     "-o".to_string(),
///     "{output}".to_string(),
/// ])?;
/// let corrected = picor.correct(&table)?;
/// # Ok::<(), sitefrac::correction::CorrectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCorrector {
    program: String,
    args: Vec<String>,
}

impl ExternalCorrector {
    /// Create a corrector from a command line (program followed by arguments)
    pub fn new(command: Vec<String>) -> Result<Self, CorrectionError> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or(CorrectionError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Program that is executed
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments before placeholder substitution
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn writes_output_file(&self) -> bool {
        self.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER))
    }
}

impl IsotopologueCorrector for ExternalCorrector {
    fn name(&self) -> &str {
        &self.program
    }

    fn correct(&self, table: &MeasurementTable) -> Result<MeasurementTable, CorrectionError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.csv");
        let output = dir.path().join("output.csv");
        table.write_csv(&input)?;

        let input_arg = input.to_string_lossy();
        let output_arg = output.to_string_lossy();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input_arg)
                    .replace(OUTPUT_PLACEHOLDER, &output_arg)
            })
            .collect();

        info!("Running isotopologue correction with '{}'", self.program);
        debug!("Correction command: {} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| CorrectionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(CorrectionError::CommandFailed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let corrected = if self.writes_output_file() {
            Table::from_path(&output)?
        } else {
            Table::from_reader(result.stdout.as_slice(), Delimiter::Comma)?
        };

        if corrected.n_rows() != table.n_rows() {
            log::warn!(
                "Correction changed the number of rows from {} to {}",
                table.n_rows(),
                corrected.n_rows()
            );
        }
        Ok(corrected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new("Time in h", vec![0.into(), 1.into()])
            .unwrap()
            .with_column("No label", vec![Some(90.0), Some(80.0)])
            .unwrap()
            .with_column("2C13", vec![Some(10.0), Some(20.0)])
            .unwrap()
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(
            ExternalCorrector::new(Vec::new()),
            Err(CorrectionError::EmptyCommand)
        ));
        assert!(matches!(
            ExternalCorrector::new(vec![" ".to_string()]),
            Err(CorrectionError::EmptyCommand)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_file_placeholder() {
        let corrector = ExternalCorrector::new(vec![
            "cp".to_string(),
            INPUT_PLACEHOLDER.to_string(),
            OUTPUT_PLACEHOLDER.to_string(),
        ])
        .unwrap();
        assert_eq!(corrector.name(), "cp");
        assert_eq!(corrector.correct(&table()).unwrap(), table());
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_output() {
        let corrector =
            ExternalCorrector::new(vec!["cat".to_string(), INPUT_PLACEHOLDER.to_string()]).unwrap();
        assert_eq!(corrector.correct(&table()).unwrap(), table());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let corrector = ExternalCorrector::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo broken >&2; exit 3".to_string(),
        ])
        .unwrap();
        match corrector.correct(&table()).unwrap_err() {
            CorrectionError::CommandFailed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let corrector =
            ExternalCorrector::new(vec!["sitefrac-no-such-corrector".to_string()]).unwrap();
        assert!(matches!(
            corrector.correct(&table()),
            Err(CorrectionError::Spawn { .. })
        ));
    }
}
