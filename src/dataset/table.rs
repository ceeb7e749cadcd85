//! Table Renderer
//!
//! Maps filtered rows onto the fixed column layout of the dataset table.

use super::DatasetRow;
use serde::Serialize;

/// Columns shown in the table, in display order
pub const TABLE_COLUMNS: [&str; 12] = [
    "Date",
    "dataset_name",
    "adata_filename",
    "technology",
    "species",
    "general tissue",
    "specific tissue region",
    "cancer or normal or other disease",
    "Spot numbers per sample",
    "Paper",
    "Source",
    "Link to view data",
];

/// A single rendered table cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableCell {
    Text(String),
    /// Opens in a new browsing context
    Link { href: String, label: String },
}

impl TableCell {
    /// Plain-text form, used by the terminal and CSV outputs
    pub fn as_text(&self) -> &str {
        match self {
            TableCell::Text(text) => text,
            TableCell::Link { href, .. } => href,
        }
    }
}

fn link_label(column: &str) -> Option<&'static str> {
    match column {
        "Source" => Some("Paper Link"),
        "Link to view data" => Some("View Data"),
        _ => None,
    }
}

/// Render one row across [`TABLE_COLUMNS`]
pub fn render_row(row: &DatasetRow) -> Vec<TableCell> {
    TABLE_COLUMNS
        .iter()
        .map(|column| match (link_label(column), row.non_empty(column)) {
            (Some(label), Some(href)) => TableCell::Link {
                href: href.to_string(),
                label: label.to_string(),
            },
            _ => TableCell::Text(row.get(column).unwrap_or("").to_string()),
        })
        .collect()
}

/// Render the whole table body from scratch
pub fn render_table<'a, I>(rows: I) -> Vec<Vec<TableCell>>
where
    I: IntoIterator<Item = &'a DatasetRow>,
{
    rows.into_iter().map(render_row).collect()
}
