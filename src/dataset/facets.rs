//! Facet Builder
//!
//! Distinct values for the tab bar and the three checkbox groups.

use super::{DatasetRow, COL_SPECIES, COL_STATUS, COL_TECHNOLOGY, COL_TISSUE};

/// Distinct facet values, each list in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub technologies: Vec<String>,
    pub tissues: Vec<String>,
    pub species: Vec<String>,
    pub statuses: Vec<String>,
}

impl Facets {
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        Self {
            technologies: distinct_values(rows, COL_TECHNOLOGY),
            tissues: distinct_values(rows, COL_TISSUE),
            species: distinct_values(rows, COL_SPECIES),
            statuses: distinct_values(rows, COL_STATUS),
        }
    }

    /// Tab selected when the page first renders
    pub fn initial_technology(&self) -> Option<&str> {
        self.technologies.first().map(String::as_str)
    }
}

/// Distinct non-empty values of a column, preserving first appearance
pub fn distinct_values(rows: &[DatasetRow], column: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in rows.iter().filter_map(|row| row.non_empty(column)) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}
