//! Mean imputation of missing numeric values

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PreprocessError, Result};
use super::features::{column_as_f64, is_numeric_column, missing_column};

/// Which rows the imputation means are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImputeMode {
    /// Means over every row, computed before the train/test split.
    /// This leaks test rows into the statistics but matches the historical
    /// behaviour of the preprocessing run.
    #[default]
    FullDataset,
    /// Means over the training rows only.
    TrainingRows,
}

impl std::fmt::Display for ImputeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeMode::FullDataset => write!(f, "full dataset"),
            ImputeMode::TrainingRows => write!(f, "training rows"),
        }
    }
}

/// Fill value for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: f64,
    /// Observed (non-missing) values the mean was computed from
    pub observed: usize,
}

/// Per-column means, in dataset column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationStats {
    pub mode: ImputeMode,
    pub means: Vec<ColumnMean>,
}

impl ImputationStats {
    pub fn mean_of(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.mean)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.means.iter().map(|m| m.column.as_str())
    }
}

/// Compute the arithmetic mean of every numeric column over its non-missing
/// entries. When `rows` is given only those row indices are considered.
///
/// A numeric column with no observed value fails with
/// [`PreprocessError::AllMissing`] rather than producing NaN.
pub fn fit_imputer(df: &DataFrame, rows: Option<&[usize]>) -> Result<ImputationStats> {
    let mode = if rows.is_some() {
        ImputeMode::TrainingRows
    } else {
        ImputeMode::FullDataset
    };

    let mut means = Vec::new();

    for column in df.get_columns().iter().filter(|c| is_numeric_column(c)) {
        let values = column_as_f64(column)?;

        let (sum, observed) = match rows {
            Some(rows) => rows
                .iter()
                .filter_map(|&i| values.get(i).copied().flatten())
                .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1)),
            None => values
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1)),
        };

        if observed == 0 {
            return Err(PreprocessError::AllMissing {
                column: column.name().to_string(),
            });
        }

        means.push(ColumnMean {
            column: column.name().to_string(),
            mean: sum / observed as f64,
            observed,
        });
    }

    Ok(ImputationStats { mode, means })
}

/// Replace missing entries of every imputed column with its fitted mean.
///
/// Returns a new frame (imputed columns become Float64, others are copied
/// unchanged) together with the number of cells that were filled.
pub fn apply_imputer(df: &DataFrame, stats: &ImputationStats) -> Result<(DataFrame, usize)> {
    if let Some(absent) = stats
        .columns()
        .find(|name| df.column(name).is_err())
    {
        return Err(missing_column(df, absent));
    }

    let mut filled = 0usize;
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let Some(mean) = stats.mean_of(column.name().as_str()) else {
            columns.push(column.clone());
            continue;
        };

        let values: Vec<f64> = column_as_f64(column)?
            .into_iter()
            .map(|v| {
                v.unwrap_or_else(|| {
                    filled += 1;
                    mean
                })
            })
            .collect();

        columns.push(Column::new(column.name().clone(), values));
    }

    Ok((DataFrame::new(columns)?, filled))
}

/// Count missing entries (null or NaN) per column, in column order.
pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|column| {
            let nan_count = if column.dtype().is_float() {
                column_as_f64(column)
                    .map(|v| v.iter().filter(|x| x.is_none()).count())
                    .unwrap_or(column.null_count())
            } else {
                column.null_count()
            };
            (column.name().to_string(), nan_count)
        })
        .collect()
}
