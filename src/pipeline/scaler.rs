//! Standardization to zero mean and unit variance

use faer::Mat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PreprocessError, Result};
use super::features::FeatureMatrix;

/// Relative threshold below which a standard deviation is treated as zero.
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Fitted standardization parameters. Immutable once fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    /// Population standard deviation per feature; 1.0 for constant features
    pub scale: Vec<f64>,
    pub variance: Vec<f64>,
    pub n_samples: usize,
    /// Features with zero variance on the training rows. They are centred but
    /// not rescaled.
    pub constant_features: Vec<String>,
}

/// Fits a [`ScalerState`] from training rows.
pub struct StandardScaler;

impl StandardScaler {
    /// Compute per-column mean and population standard deviation (ddof = 0).
    ///
    /// A zero-variance column gets a scale of 1.0 and is listed in
    /// `constant_features` so callers can warn about it.
    pub fn fit(features: &FeatureMatrix) -> Result<ScalerState> {
        let (n, p) = features.shape();
        if n == 0 || p == 0 {
            return Err(PreprocessError::EmptyInput(format!(
                "cannot fit scaler on a {}x{} matrix",
                n, p
            )));
        }

        let stats: Vec<(f64, f64)> = (0..p)
            .into_par_iter()
            .map(|j| {
                let mean = (0..n).map(|i| features.data[(i, j)]).sum::<f64>() / n as f64;
                let variance = (0..n)
                    .map(|i| {
                        let d = features.data[(i, j)] - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / n as f64;
                (mean, variance)
            })
            .collect();

        let mut mean = Vec::with_capacity(p);
        let mut scale = Vec::with_capacity(p);
        let mut variance = Vec::with_capacity(p);
        let mut constant_features = Vec::new();

        for (j, (m, var)) in stats.into_iter().enumerate() {
            let std = var.sqrt();
            if std <= ZERO_VARIANCE_TOLERANCE * m.abs().max(1.0) {
                constant_features.push(features.names[j].clone());
                scale.push(1.0);
            } else {
                scale.push(std);
            }
            mean.push(m);
            variance.push(var);
        }

        Ok(ScalerState {
            feature_names: features.names.clone(),
            mean,
            scale,
            variance,
            n_samples: n,
            constant_features,
        })
    }

    /// Fit on `features` and return the fitted state with the scaled rows.
    pub fn fit_transform(features: &FeatureMatrix) -> Result<(ScalerState, FeatureMatrix)> {
        let state = Self::fit(features)?;
        let scaled = state.transform(features)?;
        Ok((state, scaled))
    }
}

impl ScalerState {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize with the stored training statistics; nothing is refit.
    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        if features.ncols() != self.n_features() {
            return Err(PreprocessError::ShapeMismatch {
                expected: self.n_features(),
                actual: features.ncols(),
            });
        }

        let data = Mat::from_fn(features.nrows(), features.ncols(), |i, j| {
            (features.data[(i, j)] - self.mean[j]) / self.scale[j]
        });
        FeatureMatrix::new(features.names.clone(), data)
    }

    /// Map standardized values back to the original units.
    pub fn inverse_transform(&self, scaled: &FeatureMatrix) -> Result<FeatureMatrix> {
        if scaled.ncols() != self.n_features() {
            return Err(PreprocessError::ShapeMismatch {
                expected: self.n_features(),
                actual: scaled.ncols(),
            });
        }

        let data = Mat::from_fn(scaled.nrows(), scaled.ncols(), |i, j| {
            scaled.data[(i, j)] * self.scale[j] + self.mean[j]
        });
        FeatureMatrix::new(scaled.names.clone(), data)
    }

    /// Check internal consistency, e.g. after deserializing.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let p = self.feature_names.len();
        if self.mean.len() != p || self.scale.len() != p || self.variance.len() != p {
            return Err(format!(
                "inconsistent lengths: names={}, mean={}, scale={}, variance={}",
                p,
                self.mean.len(),
                self.scale.len(),
                self.variance.len()
            ));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err("scale values must be finite and positive".to_string());
        }
        Ok(())
    }
}
