//! Filter and extract rule types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Cell, Record};

/// Column holding the delay reason of a work order
pub const DELAY_REASON_COLUMN: &str = "delayreason";
/// Column holding the technician skillset of a work order
pub const SKILLSET_COLUMN: &str = "skillset";

/// Conjunction of exact-match criteria (column -> required text)
///
/// A record matches when every criterion's column holds exactly that text.
/// A missing column, or a non-text cell, never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterRule {
    criteria: BTreeMap<String, String>,
}

impl FilterRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion (builder style)
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.criteria.insert(column.into(), value.into());
        self
    }

    /// Check whether a record satisfies every criterion
    pub fn matches(&self, record: &Record<'_>) -> bool {
        self.criteria.iter().all(|(column, expected)| {
            matches!(record.get(column), Some(Cell::Text(actual)) if actual == expected)
        })
    }
}

/// One output file: the rows of a single (skillset, delay reason) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRule {
    pub skillset: String,
    pub delayreason: String,
}

impl ExtractRule {
    pub fn new(skillset: impl Into<String>, delayreason: impl Into<String>) -> Self {
        Self {
            skillset: skillset.into(),
            delayreason: delayreason.into(),
        }
    }

    /// Criteria selecting this extract's rows
    pub fn filter_rule(&self) -> FilterRule {
        FilterRule::new()
            .with(DELAY_REASON_COLUMN, self.delayreason.clone())
            .with(SKILLSET_COLUMN, self.skillset.clone())
    }

    /// Output file name, e.g. `Install_(X)_CHC-HOUSE_UNIT_CLOSED.xlsx`
    ///
    /// Every space becomes `_` in both parts and every `/` becomes `_` in the
    /// reason. Other punctuation is kept as-is.
    pub fn output_name(&self) -> String {
        let skill = self.skillset.replace(' ', "_");
        let reason = self.delayreason.replace(' ', "_").replace('/', "_");
        format!("{}_{}.xlsx", skill, reason)
    }
}
