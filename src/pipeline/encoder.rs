//! Label encoding of categorical (text) columns

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PreprocessError, Result};
use super::features::{column_as_str, is_categorical_column, missing_column};

/// Code table for one categorical column.
///
/// `classes[code]` is the original value, so classes are kept sorted and
/// codes follow lexicographic order of the observed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEncoding {
    pub column: String,
    pub classes: Vec<String>,
}

impl ColumnEncoding {
    pub fn encode(&self, value: &str) -> Option<i64> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
            .map(|i| i as i64)
    }

    pub fn decode(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }
}

/// One independent code table per categorical column, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingMaps {
    pub columns: Vec<ColumnEncoding>,
}

impl EncodingMaps {
    pub fn get(&self, column: &str) -> Option<&ColumnEncoding> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn encode(&self, column: &str, value: &str) -> Option<i64> {
        self.get(column)?.encode(value)
    }

    pub fn decode(&self, column: &str, code: i64) -> Option<&str> {
        self.get(column)?.decode(code)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Build a fresh code table from each categorical column's own values.
pub fn fit_encoder(df: &DataFrame) -> Result<EncodingMaps> {
    let mut columns = Vec::new();

    for column in df.get_columns().iter().filter(|c| is_categorical_column(c)) {
        let values = column_as_str(column)?;

        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            return Err(PreprocessError::MissingCategorical {
                column: column.name().to_string(),
                count: missing,
            });
        }

        let classes: BTreeSet<String> = values.into_iter().flatten().collect();
        columns.push(ColumnEncoding {
            column: column.name().to_string(),
            classes: classes.into_iter().collect(),
        });
    }

    Ok(EncodingMaps { columns })
}

/// Overwrite every encoded column with its Int64 codes. Columns without a
/// code table are copied unchanged.
pub fn apply_encoder(df: &DataFrame, maps: &EncodingMaps) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());

    for encoding in &maps.columns {
        if df.column(&encoding.column).is_err() {
            return Err(missing_column(df, &encoding.column));
        }
    }

    for column in df.get_columns() {
        let Some(encoding) = maps.get(column.name().as_str()) else {
            columns.push(column.clone());
            continue;
        };

        let codes = column_as_str(column)?
            .into_iter()
            .map(|value| match value {
                None => Err(PreprocessError::MissingCategorical {
                    column: encoding.column.clone(),
                    count: column.null_count(),
                }),
                Some(value) => encoding.encode(&value).ok_or_else(|| {
                    PreprocessError::UnseenCategory {
                        column: encoding.column.clone(),
                        value,
                    }
                }),
            })
            .collect::<Result<Vec<i64>>>()?;

        columns.push(Column::new(column.name().clone(), codes));
    }

    Ok(DataFrame::new(columns)?)
}
