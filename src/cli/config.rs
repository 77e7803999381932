//! TOML configuration file support.
//!
//! Instead of repeating flags for every run, an experiment can be described
//! in a config file:
//!
//! ```toml
//! # sitefrac.toml
//! [columns]
//! "K(ac)QLATK(ac)AAR" = "No label"
//! "K(ac)QLATK(ac13C)AAR" = "2C13"
//!
//! [input]
//! drop_columns = ["compound", "replicate"]
//! relative_to = 100.0
//!
//! [correction]
//! enabled = true
//! command = ["picor", "{input}", "K(ac)QLATK(ac)AAR", "-o", "{output}"]
//!
//! [splitting]
//! directory = "sites"
//! percent_prefix = "% "
//! sum_tolerance = 0.01
//!
//! [[splitting.sites]]
//! sheet = "K1"
//! column = "2C13"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sitefrac::labels::ColumnMapper;
use sitefrac::site::SiteMapping;

/// Root configuration structure for sitefrac.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Raw column name to isotopologue label substitution.
    /// The built-in peptide map is used when omitted.
    pub columns: Option<HashMap<String, String>>,

    /// Input preparation settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Isotopologue correction settings.
    #[serde(default)]
    pub correction: CorrectionConfig,

    /// Site splitting settings.
    #[serde(default)]
    pub splitting: SplittingConfig,
}

/// Configuration applied right after loading the raw table.
#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    /// Columns to remove before any processing.
    #[serde(default)]
    pub drop_columns: Vec<String>,

    /// Rescale so the largest intensity equals this value.
    pub relative_to: Option<f64>,
}

/// Configuration of the external isotopologue corrector.
#[derive(Debug, Default, Deserialize)]
pub struct CorrectionConfig {
    /// Run the correction step.
    pub enabled: Option<bool>,

    /// Command line of the correction tool with `{input}`/`{output}` placeholders.
    pub command: Option<Vec<String>>,
}

/// Configuration of the site-fraction redistribution.
#[derive(Debug, Default, Deserialize)]
pub struct SplittingConfig {
    /// Directory holding one splitting table per site.
    pub directory: Option<PathBuf>,

    /// Header prefix of percentage columns.
    pub percent_prefix: Option<String>,

    /// Allowed deviation of percentage sums from 100.
    pub sum_tolerance: Option<f64>,

    /// Skip the percentage-sum check.
    pub skip_sum_check: Option<bool>,

    /// Site table to isotopologue column assignments, in splitting order.
    #[serde(default)]
    pub sites: Vec<SiteAssignment>,
}

/// One `[[splitting.sites]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteAssignment {
    /// Site table name (file stem of the splitting table).
    pub sheet: String,

    /// Isotopologue column split by that table.
    pub column: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_str(&content)?;

        // Relative splitting directories are resolved against the config file
        if let (Some(dir), Some(base)) = (config.splitting.directory.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Column mapper described by the `[columns]` table, if any.
    pub fn column_mapper(&self) -> Option<ColumnMapper> {
        self.columns
            .as_ref()
            .map(|labels| labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
    }

    /// Site mapping described by the `[[splitting.sites]]` entries, if any.
    pub fn site_mapping(&self) -> Option<SiteMapping> {
        if self.splitting.sites.is_empty() {
            return None;
        }
        Some(
            self.splitting
                .sites
                .iter()
                .map(|s| (s.sheet.as_str(), s.column.as_str()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [columns]
            "K(ac)QLATK(ac)AAR" = "No label"
            "K(ac)QLATK(ac13C)AAR" = "2C13"

            [input]
            drop_columns = ["compound", "replicate"]
            relative_to = 100.0

            [correction]
            enabled = true
            command = ["picor", "{input}", "-o", "{output}"]

            [splitting]
            directory = "sites"
            sum_tolerance = 0.5

            [[splitting.sites]]
            sheet = "K2"
            column = "4C13"

            [[splitting.sites]]
            sheet = "K1"
            column = "2C13"
        "#;

        let config = Config::from_str(toml).unwrap();
        let mapper = config.column_mapper().unwrap();
        assert_eq!(mapper.label("K(ac)QLATK(ac13C)AAR"), Some("2C13"));
        assert_eq!(config.input.drop_columns, vec!["compound", "replicate"]);
        assert_eq!(config.input.relative_to, Some(100.0));
        assert_eq!(config.correction.enabled, Some(true));
        assert_eq!(config.correction.command.as_ref().unwrap()[0], "picor");
        assert_eq!(config.splitting.directory, Some(PathBuf::from("sites")));
        assert_eq!(config.splitting.sum_tolerance, Some(0.5));

        let mapping = config.site_mapping().unwrap();
        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![("K2", "4C13"), ("K1", "2C13")]
        );
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [correction]
            enabled = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.correction.enabled, Some(false));
        assert!(config.column_mapper().is_none());
        assert!(config.site_mapping().is_none());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert!(config.columns.is_none());
        assert!(config.splitting.directory.is_none());
    }
}
