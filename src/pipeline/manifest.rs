//! Run manifest persisted next to the fitted transforms
//!
//! The scaler and reducer only make sense on data prepared exactly like the
//! training data. The manifest records that preparation (column order,
//! imputation means, encoding tables) so new rows can be brought into the
//! same feature space.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use super::encoder::{apply_encoder, EncodingMaps};
use super::error::Result;
use super::features::{select_features, FeatureMatrix};
use super::imputer::{apply_imputer, ImputationStats};
use super::reducer::ReducerState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub tool_version: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub target_column: String,
    /// Feature columns in the order the scaler expects them
    pub feature_columns: Vec<String>,
    pub imputation: ImputationStats,
    pub encoding: EncodingMaps,
    pub test_size: f64,
    pub seed: u64,
    pub variance_target: f64,
    pub n_components: usize,
    pub explained_variance_ratio: Vec<f64>,
    pub variance_target_met: bool,
}

/// Inputs for [`Manifest::new`] that are not carried by the fitted states.
#[derive(Debug, Clone)]
pub struct ManifestParams {
    pub target_column: String,
    pub feature_columns: Vec<String>,
    pub test_size: f64,
    pub seed: u64,
}

impl Manifest {
    pub fn new(
        params: ManifestParams,
        imputation: ImputationStats,
        encoding: EncodingMaps,
        reducer: &ReducerState,
    ) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            target_column: params.target_column,
            feature_columns: params.feature_columns,
            imputation,
            encoding,
            test_size: params.test_size,
            seed: params.seed,
            variance_target: reducer.variance_target,
            n_components: reducer.n_components(),
            explained_variance_ratio: reducer.explained_variance_ratio.clone(),
            variance_target_met: reducer.target_met,
        }
    }

    /// Impute, encode and order new rows the way the training data was.
    ///
    /// The target column is not required; if present it is ignored.
    pub fn prepare_features(&self, df: &DataFrame) -> Result<FeatureMatrix> {
        let present = |name: &str| df.column(name).is_ok();

        // Imputation means of the target are not needed for features only
        let imputation = ImputationStats {
            mode: self.imputation.mode,
            means: self
                .imputation
                .means
                .iter()
                .filter(|m| m.column != self.target_column || present(&m.column))
                .cloned()
                .collect(),
        };

        let (imputed, _) = apply_imputer(df, &imputation)?;
        let encoded = apply_encoder(&imputed, &self.encoding)?;
        select_features(&encoded, &self.feature_columns)
    }
}
