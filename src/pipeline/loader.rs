//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::PreprocessError;

/// Shape and memory footprint of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub rows: usize,
    pub cols: usize,
    pub memory_mb: f64,
}

impl DatasetStats {
    pub fn of(df: &DataFrame) -> Self {
        let (rows, cols) = df.shape();
        Self {
            rows,
            cols,
            memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
        }
    }
}

/// Field values read as missing in CSV input, on top of empty fields.
const CSV_NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Build a lazy scan of the file, choosing the reader from the extension.
fn scan_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means scan the whole file before deciding column types
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_length)
            .with_null_values(Some(NullValues::AllColumns(
                CSV_NULL_TOKENS.iter().map(|t| (*t).into()).collect(),
            )))
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load a dataset into memory. Column types (numeric vs. text) are inferred
/// from the content.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    scan_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))
}

/// Check that the target column exists and is numeric.
pub fn validate_target(df: &DataFrame, target: &str) -> super::Result<()> {
    let column = df
        .column(target)
        .map_err(|_| PreprocessError::MissingColumn {
            column: target.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })?;

    // An entirely empty target column is inferred as text; the imputer reports it
    let dtype = column.dtype();
    if dtype.is_primitive_numeric() || column.null_count() == column.len() {
        Ok(())
    } else {
        Err(PreprocessError::NonNumericTarget {
            column: target.to_string(),
            dtype: dtype.to_string(),
        })
    }
}
