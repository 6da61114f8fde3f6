//! Column access helpers and feature/target extraction
//!
//! Stages exchange polars `DataFrame`s up to encoding. From here on the data
//! is a dense row-major view in a [`FeatureMatrix`] backed by `faer::Mat`.

use faer::Mat;
use polars::prelude::*;

use super::error::{PreprocessError, Result};

/// Named dense matrix: one row per sample, one column per feature.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub data: Mat<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, data: Mat<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(PreprocessError::ShapeMismatch {
                expected: names.len(),
                actual: data.ncols(),
            });
        }
        Ok(Self { names, data })
    }

    /// Build from column-major vectors of equal length.
    pub fn from_columns(names: Vec<String>, columns: &[Vec<f64>]) -> Result<Self> {
        let nrows = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != nrows) {
            return Err(PreprocessError::ShapeMismatch {
                expected: nrows,
                actual: bad.len(),
            });
        }
        let data = Mat::from_fn(nrows, columns.len(), |i, j| columns[j][i]);
        Self::new(names, data)
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.nrows()).map(|i| self.data[(i, col)]).collect()
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.ncols()).map(|j| self.data[(row, j)]).collect()
    }

    /// Convert back to a polars frame, e.g. to write projected rows to disk.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .names
            .iter()
            .enumerate()
            .map(|(j, name)| Column::new(name.as_str().into(), self.column(j)))
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

/// Numeric columns are imputed; booleans and columns with no observed value
/// at all (which CSV inference types as text) count as numeric too.
pub fn is_numeric_column(column: &Column) -> bool {
    let dtype = column.dtype();
    dtype.is_primitive_numeric()
        || matches!(dtype, DataType::Boolean | DataType::Null)
        || (is_text_dtype(dtype) && column.len() > 0 && column.null_count() == column.len())
}

/// Text columns with at least one observed value are label-encoded.
pub fn is_categorical_column(column: &Column) -> bool {
    is_text_dtype(column.dtype()) && !is_numeric_column(column)
}

fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(..))
}

/// Read a column as optional floats; NaN counts as missing.
pub fn column_as_f64(column: &Column) -> Result<Vec<Option<f64>>> {
    let series = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(|_| PreprocessError::UnsupportedColumn {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        })?;
    let ca = series.f64()?;
    Ok(ca
        .iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Read a text column as optional owned strings.
pub fn column_as_str(column: &Column) -> Result<Vec<Option<String>>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let ca = series.str()?;
    Ok(ca.iter().map(|v| v.map(str::to_string)).collect())
}

/// Read a column that must be fully observed numeric data.
fn dense_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name).map_err(|_| missing_column(df, name))?;
    if !(is_numeric_column(column)) {
        return Err(PreprocessError::UnsupportedColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    column_as_f64(column)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| PreprocessError::MissingValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

pub(crate) fn missing_column(df: &DataFrame, name: &str) -> PreprocessError {
    PreprocessError::MissingColumn {
        column: name.to_string(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Split an imputed and encoded frame into the feature matrix (every column
/// except the target, in dataset order) and the aligned target vector.
pub fn extract_features(df: &DataFrame, target: &str) -> Result<(FeatureMatrix, Vec<f64>)> {
    let target_values = dense_column(df, target)?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| name != target)
        .collect();

    if names.is_empty() {
        return Err(PreprocessError::EmptyInput(format!(
            "no feature columns besides target '{}'",
            target
        )));
    }

    let features = select_features(df, &names)?;
    Ok((features, target_values))
}

/// Build a feature matrix from the named columns, in the given order.
pub fn select_features(df: &DataFrame, names: &[String]) -> Result<FeatureMatrix> {
    let columns = names
        .iter()
        .map(|name| dense_column(df, name))
        .collect::<Result<Vec<_>>>()?;
    FeatureMatrix::from_columns(names.to_vec(), &columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_layout() {
        let fm = FeatureMatrix::from_columns(
            vec!["a".to_string(), "b".to_string()],
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();
        assert_eq!(fm.shape(), (3, 2));
        assert_eq!(fm.row(1), vec![2.0, 5.0]);
        assert_eq!(fm.column(1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let result = FeatureMatrix::from_columns(
            vec!["a".to_string(), "b".to_string()],
            &[vec![1.0, 2.0], vec![3.0]],
        );
        assert!(matches!(result, Err(PreprocessError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_all_null_text_column_is_numeric() {
        let column = Column::new("empty".into(), [None::<&str>, None, None]);
        assert!(is_numeric_column(&column));
        assert!(!is_categorical_column(&column));
    }

    #[test]
    fn test_nan_reads_as_missing() {
        let column = Column::new("x".into(), [1.0f64, f64::NAN, 3.0]);
        let values = column_as_f64(&column).unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }
}
