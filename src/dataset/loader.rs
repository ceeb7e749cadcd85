//! CSV Loader
//!
//! Parses the published dataset sheet with header-row semantics.
//! Fetch or parse failures leave the dataset empty; nothing is retried.

use super::{DatasetError, DatasetRow, COL_ADATA_FILENAME, COL_DATASET_NAME};
use std::path::Path;

/// Result of parsing a CSV document
#[derive(Debug, Default)]
pub struct CsvLoadResult {
    pub rows: Vec<DatasetRow>,
    /// Rows without a dataset name or file name
    pub rows_discarded: usize,
    /// Records the reader could not decode
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Normalize a header cell: surrounding whitespace and a leading BOM go away
pub fn normalize_key(key: &str) -> String {
    let trimmed = key.trim();
    trimmed.strip_prefix('\u{feff}').unwrap_or(trimmed).to_string()
}

/// Parse CSV text into dataset rows
pub fn parse_csv(csv_data: &str) -> Result<CsvLoadResult, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_key).collect();

    let mut result = CsvLoadResult::default();

    for (line_num, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                // Header occupies line 1
                result.errors.push(format!("Line {}: {}", line_num + 2, e));
                result.rows_failed += 1;
                continue;
            }
        };

        let mut row = DatasetRow::new();
        for (idx, header) in headers.iter().enumerate() {
            row.insert(header, record.get(idx).unwrap_or(""));
        }

        if row.non_empty(COL_DATASET_NAME).is_none() && row.non_empty(COL_ADATA_FILENAME).is_none()
        {
            result.rows_discarded += 1;
            continue;
        }

        result.rows.push(row);
    }

    Ok(result)
}

/// Parse CSV text, logging and swallowing any failure
pub fn load_from_str(csv_data: &str) -> Vec<DatasetRow> {
    match parse_csv(csv_data) {
        Ok(result) => {
            if result.rows_failed > 0 {
                tracing::warn!(
                    "Skipped {} malformed CSV records: {:?}",
                    result.rows_failed,
                    result.errors
                );
            }
            tracing::debug!(
                "Loaded {} dataset rows ({} discarded)",
                result.rows.len(),
                result.rows_discarded
            );
            result.rows
        }
        Err(e) => {
            tracing::warn!("Failed to parse dataset CSV: {}", e);
            Vec::new()
        }
    }
}

/// Read a CSV file from disk, logging and swallowing any failure
pub fn load_from_path(path: &Path) -> Vec<DatasetRow> {
    match std::fs::read_to_string(path).map_err(DatasetError::from) {
        Ok(text) => load_from_str(&text),
        Err(e) => {
            tracing::warn!("Failed to read dataset CSV {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Fetch the CSV document as text
#[cfg(feature = "native")]
pub async fn fetch_csv(client: &reqwest::Client, url: &str) -> Result<String, DatasetError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DatasetError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DatasetError::Status(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| DatasetError::Fetch(e.to_string()))
}

/// Fetch and parse the CSV feed, returning an empty dataset on failure
#[cfg(feature = "native")]
pub async fn load_from_url(client: &reqwest::Client, url: &str) -> Vec<DatasetRow> {
    match fetch_csv(client, url).await {
        Ok(text) => load_from_str(&text),
        Err(e) => {
            tracing::warn!("Failed to fetch dataset CSV from {}: {}", url, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_normalized() {
        let csv_data = "\u{feff}Date , dataset_name,  technology\n2024-01-01,liver_01,Visium\n";

        let result = parse_csv(csv_data).unwrap();
        assert_eq!(result.rows.len(), 1);

        let row = &result.rows[0];
        assert_eq!(row.get("Date"), Some("2024-01-01"));
        assert_eq!(row.get("dataset_name"), Some("liver_01"));
        assert_eq!(row.get("technology"), Some("Visium"));
    }

    #[test]
    fn test_rows_without_identifiers_are_discarded() {
        let csv_data = "dataset_name,adata_filename,species
liver_01,,human
,lung.h5ad,mouse
,,human
";

        let result = parse_csv(csv_data).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows_discarded, 1);
        assert_eq!(result.rows[0].get("dataset_name"), Some("liver_01"));
        assert_eq!(result.rows[1].get("adata_filename"), Some("lung.h5ad"));
    }

    #[test]
    fn test_short_records_fill_with_empty() {
        let csv_data = "dataset_name,species,Source
brain_02,human
";

        let result = parse_csv(csv_data).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("Source"), Some(""));
        assert_eq!(result.rows[0].len(), 3);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv_data = "dataset_name,Paper
kidney_03,\"Smith, J. et al. (2023)\"
";

        let rows = load_from_str(csv_data);
        assert_eq!(rows[0].get("Paper"), Some("Smith, J. et al. (2023)"));
    }

    #[test]
    fn test_empty_document_yields_no_rows() {
        assert!(load_from_str("").is_empty());
        assert!(load_from_str("dataset_name,species\n").is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let rows = load_from_path(&dir.path().join("missing.csv"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.csv");
        std::fs::write(&path, "dataset_name,technology\nheart_01,Xenium\n").unwrap();

        let rows = load_from_path(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("technology"), Some("Xenium"));
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_unreachable_url_is_empty_dataset() {
        let client = reqwest::Client::new();
        let rows = load_from_url(&client, "http://127.0.0.1:9/datasets.csv").await;
        assert!(rows.is_empty());
    }
}
