//! Filter Engine
//!
//! The visible table is a pure function of (rows, [`FilterState`]). Every
//! predicate is vacuously true when its facet has no selection, and all
//! predicates compose with AND.

use super::{DatasetRow, Facets, COL_SPECIES, COL_STATUS, COL_TECHNOLOGY, COL_TISSUE};
use std::collections::BTreeSet;

/// Current user selection on the dataset page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub active_technology: Option<String>,
    pub selected_tissues: BTreeSet<String>,
    pub selected_species: BTreeSet<String>,
    pub selected_statuses: BTreeSet<String>,
    pub search_text: String,
}

impl FilterState {
    /// State after load: first technology tab active, nothing checked
    pub fn initial(facets: &Facets) -> Self {
        Self {
            active_technology: facets.initial_technology().map(str::to_string),
            ..Self::default()
        }
    }

    pub fn select_technology(&mut self, technology: &str) {
        self.active_technology = Some(technology.to_string());
    }

    pub fn toggle_tissue(&mut self, tissue: &str, checked: bool) {
        toggle(&mut self.selected_tissues, tissue, checked);
    }

    pub fn toggle_species(&mut self, species: &str, checked: bool) {
        toggle(&mut self.selected_species, species, checked);
    }

    pub fn toggle_status(&mut self, status: &str, checked: bool) {
        toggle(&mut self.selected_statuses, status, checked);
    }

    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    /// Whether a row survives every active predicate
    pub fn matches(&self, row: &DatasetRow) -> bool {
        let matches_tech = match &self.active_technology {
            Some(tech) => row.get(COL_TECHNOLOGY) == Some(tech.as_str()),
            None => true,
        };

        matches_tech
            && self.matches_search(row)
            && in_selection(&self.selected_tissues, row.get(COL_TISSUE))
            && in_selection(&self.selected_species, row.get(COL_SPECIES))
            && in_selection(&self.selected_statuses, row.get(COL_STATUS))
    }

    fn matches_search(&self, row: &DatasetRow) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        row.joined_text()
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str, checked: bool) {
    if checked {
        set.insert(value.to_string());
    } else {
        set.remove(value);
    }
}

fn in_selection(selection: &BTreeSet<String>, value: Option<&str>) -> bool {
    selection.is_empty() || value.map_or(false, |v| selection.contains(v))
}

/// Rows that satisfy the filter, in their original order
pub fn apply_filters<'a>(rows: &'a [DatasetRow], state: &FilterState) -> Vec<&'a DatasetRow> {
    rows.iter().filter(|row| state.matches(row)).collect()
}
