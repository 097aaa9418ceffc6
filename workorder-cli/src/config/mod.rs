//! Extraction configuration: filter tables, extract list and column layout
//!
//! The built-in tables are returned by [`ExtractConfig::default`]. A TOML file
//! with the same shape (see `workorder-cli rules`) replaces them.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::{ExtractError, ExtractRule, FilterRule};

const CLOSED_REASON: &str = "(X) CHC-HOUSE/UNIT CLOSED";
const RESCHEDULE_REASON: &str = "(X) CRES - RESKED  WITH PREFERRED DATE";

/// Complete configuration for one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Column identifying a work order; forward-filled over blanks
    pub identity_column: String,
    /// Allow-list of output columns, in output order
    pub columns: Vec<String>,
    /// Columns moved to the front of every extract, in this order
    pub leading_columns: Vec<String>,
    /// Criteria every row must satisfy before any extract
    pub customer_filter: FilterRule,
    /// One output file per entry, written in this order
    pub extracts: Vec<ExtractRule>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            identity_column: "workordernumber".to_string(),
            columns: to_strings(&[
                "workordernumber",
                "customername",
                "customeraddress",
                "customercontact",
                "customertype",
                "customersubtype",
                "skillset",
                "queue",
                "substatus",
                "delaycode",
                "delayreason",
                "delaynotes",
                "lastupdatedate",
            ]),
            leading_columns: to_strings(&[
                "workordernumber",
                "customername",
                "customercontact",
                "customeraddress",
                "lastupdatedate",
            ]),
            customer_filter: FilterRule::new()
                .with("customertype", "Consumer")
                .with("customersubtype", "Regular"),
            extracts: vec![
                ExtractRule::new("Install", CLOSED_REASON),
                ExtractRule::new("Repair", CLOSED_REASON),
                ExtractRule::new("Install", RESCHEDULE_REASON),
                ExtractRule::new("Repair", RESCHEDULE_REASON),
            ],
        }
    }
}

impl ExtractConfig {
    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid rules file: {}", path.display()))?;

        log::info!(
            "Loaded {} extract rules from {}",
            config.extracts.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load from a configuration file if given, otherwise use the built-in tables
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse rules TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize rules to TOML")
    }

    /// Check the configuration can drive a run
    ///
    /// Requires a non-empty identity column, column allow-list and extract
    /// list, and distinct output file names free of path separators.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.identity_column.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "identity_column must not be empty".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "columns allow-list must not be empty".to_string(),
            ));
        }
        if self.extracts.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "at least one extract rule is required".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for name in self.output_names() {
            if name.contains(['/', '\\']) {
                return Err(ExtractError::InvalidConfig(format!(
                    "extract file name '{}' must not contain a path separator",
                    name
                )));
            }
            if !names.insert(name.clone()) {
                return Err(ExtractError::InvalidConfig(format!(
                    "two extract rules produce the same file name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Output file names, in extract order
    pub fn output_names(&self) -> Vec<String> {
        self.extracts.iter().map(ExtractRule::output_name).collect()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
