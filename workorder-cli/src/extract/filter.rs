//! Row filtering, deduplication and column shaping for extracts

use std::collections::HashSet;

use super::types::{Dataset, FilterRule};

/// Rows matching every criterion of `rule`, in original order
pub fn apply_filter(dataset: &Dataset, rule: &FilterRule) -> Dataset {
    dataset.filter(|record| rule.matches(record))
}

/// Drop rows identical (in every column) to an earlier row
pub fn dedup_rows(mut dataset: Dataset) -> Dataset {
    let mut seen = HashSet::new();
    dataset.retain_rows(|row| seen.insert(row.clone()));
    dataset
}

/// Project onto the allow-listed columns, placing `leading` columns first
///
/// Allow-listed columns missing from the dataset are dropped silently.
/// Leading columns come first in their own order (those present after
/// projection), followed by the remaining projected columns in allow-list
/// order.
pub fn shape_columns(dataset: &Dataset, allowed: &[String], leading: &[String]) -> Dataset {
    let present: Vec<&String> = allowed
        .iter()
        .filter(|name| dataset.has_column(name))
        .collect();

    let mut order: Vec<String> = leading
        .iter()
        .filter(|name| present.contains(name))
        .cloned()
        .collect();

    order.extend(
        present
            .into_iter()
            .filter(|name| !leading.contains(*name))
            .cloned(),
    );

    dataset.select(&order)
}
