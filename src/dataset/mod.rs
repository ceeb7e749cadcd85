//! Dataset Browser
//!
//! Loads the published dataset sheet and turns it into a filterable table.
//!
//! ## Data Flow
//!
//! 1. [`loader`] fetches the CSV and produces [`DatasetRow`]s
//! 2. [`facets`] derives the technology tabs and checkbox groups
//! 3. [`filter`] evaluates the active [`FilterState`] against every row
//! 4. [`table`] turns the surviving rows into cells for display

pub mod facets;
pub mod filter;
pub mod loader;
pub mod table;

pub use facets::Facets;
pub use filter::{apply_filters, FilterState};
pub use loader::{load_from_path, load_from_str, parse_csv, CsvLoadResult};
#[cfg(feature = "native")]
pub use loader::{fetch_csv, load_from_url};
pub use table::{render_row, render_table, TableCell, TABLE_COLUMNS};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column holding the dataset identifier
pub const COL_DATASET_NAME: &str = "dataset_name";
/// Column holding the AnnData file name
pub const COL_ADATA_FILENAME: &str = "adata_filename";
/// Column driving the tab bar
pub const COL_TECHNOLOGY: &str = "technology";
pub const COL_TISSUE: &str = "general tissue";
pub const COL_SPECIES: &str = "species";
pub const COL_STATUS: &str = "cancer or normal or other disease";

/// One record of the dataset sheet.
///
/// Columns keep the order of the header row. Keys are already normalized
/// (trimmed, byte-order mark removed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetRow {
    columns: Vec<(String, String)>,
}

impl DatasetRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert a value; a repeated column overwrites the earlier one
    pub fn insert(&mut self, column: &str, value: &str) {
        match self.columns.iter_mut().find(|(k, _)| k == column) {
            Some((_, v)) => *v = value.to_string(),
            None => self.columns.push((column.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    /// Value for a column, treating empty cells as absent
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// All values joined by a single space, in column order
    pub fn joined_text(&self) -> String {
        self.columns
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for DatasetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (k, v) in &self.columns {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Errors while fetching or parsing the dataset feed
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Source returned status {0}")]
    Status(u16),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_overwrites_repeated_column() {
        let row = DatasetRow::new()
            .with("species", "human")
            .with("technology", "Visium")
            .with("species", "mouse");

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("species"), Some("mouse"));
        assert_eq!(row.joined_text(), "mouse Visium");
    }

    #[test]
    fn test_non_empty_skips_blank_cells() {
        let row = DatasetRow::new().with("Paper", "");
        assert_eq!(row.get("Paper"), Some(""));
        assert_eq!(row.non_empty("Paper"), None);
        assert_eq!(row.non_empty("Source"), None);
    }

    #[test]
    fn test_serializes_as_object() {
        let row = DatasetRow::new()
            .with("dataset_name", "liver_01")
            .with("species", "human");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"dataset_name":"liver_01","species":"human"}"#);
    }
}
