//! Principal component analysis with a cumulative explained-variance target
//!
//! The basis comes from the eigendecomposition of the sample covariance
//! matrix of the (already standardized) training rows:
//!
//! 1. Centre the rows on their column means
//! 2. `C = Xcᵀ Xc / (n - 1)`
//! 3. Eigendecompose `C` (self-adjoint, via faer) and rank eigenvectors by
//!    the variance they explain
//! 4. Keep the smallest prefix whose cumulative explained-variance ratio
//!    reaches the target
//!
//! Component signs are made deterministic by forcing the largest-magnitude
//! loading of each component to be positive.

use faer::Mat;
use serde::{Deserialize, Serialize};

use super::error::{PreprocessError, Result};
use super::features::FeatureMatrix;

/// Rounding slack allowed only for a target of 1.0, where the summed ratios
/// can land just below one.
const FULL_VARIANCE_TOLERANCE: f64 = 1e-10;

/// Fitted projection. Immutable once fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducerState {
    /// Column means of the fitting rows, subtracted before projecting
    pub mean: Vec<f64>,
    /// Retained components, one loading vector per row (k x p)
    pub components: Vec<Vec<f64>>,
    /// Variance along each retained component
    pub explained_variance: Vec<f64>,
    /// Fraction of total variance along each retained component
    pub explained_variance_ratio: Vec<f64>,
    /// Ratios for every available component, including the dropped ones
    pub all_variance_ratios: Vec<f64>,
    pub variance_target: f64,
    /// False when even every component together explains less than the target
    pub target_met: bool,
    pub n_samples: usize,
}

/// Fits a [`ReducerState`] from scaled training rows.
pub struct Pca;

impl Pca {
    pub fn fit(features: &FeatureMatrix, variance_target: f64) -> Result<ReducerState> {
        if !(variance_target > 0.0 && variance_target <= 1.0) {
            return Err(PreprocessError::InvalidVarianceTarget(variance_target));
        }

        let (n, p) = features.shape();
        if n < 2 || p == 0 {
            return Err(PreprocessError::EmptyInput(format!(
                "PCA needs at least 2 rows and 1 column, got {}x{}",
                n, p
            )));
        }

        let mean: Vec<f64> = (0..p)
            .map(|j| (0..n).map(|i| features.data[(i, j)]).sum::<f64>() / n as f64)
            .collect();

        let centered = Mat::from_fn(n, p, |i, j| features.data[(i, j)] - mean[j]);
        let gram = centered.transpose() * &centered;
        let denom = (n - 1) as f64;
        let covariance = Mat::from_fn(p, p, |i, j| gram[(i, j)] / denom);

        let (variances, vectors) = ranked_eigenpairs(&covariance);

        let total: f64 = variances.iter().sum();
        if !(total > 0.0) {
            return Err(PreprocessError::ZeroTotalVariance);
        }

        // At most min(n, p) directions carry variance
        let available = n.min(p);
        let all_variance_ratios: Vec<f64> = variances[..available]
            .iter()
            .map(|v| v / total)
            .collect();

        let (k, target_met) = select_component_count(&all_variance_ratios, variance_target);

        Ok(ReducerState {
            mean,
            components: vectors.into_iter().take(k).collect(),
            explained_variance: variances[..k].to_vec(),
            explained_variance_ratio: all_variance_ratios[..k].to_vec(),
            all_variance_ratios,
            variance_target,
            target_met,
            n_samples: n,
        })
    }

    /// Fit on `features` and return the fitted state with the projected rows.
    pub fn fit_transform(
        features: &FeatureMatrix,
        variance_target: f64,
    ) -> Result<(ReducerState, FeatureMatrix)> {
        let state = Self::fit(features, variance_target)?;
        let projected = state.transform(features)?;
        Ok((state, projected))
    }
}

/// Smallest `k` whose cumulative ratio reaches `target`, and whether it was
/// reached at all. When unreachable every available component is kept.
pub fn select_component_count(ratios: &[f64], target: f64) -> (usize, bool) {
    let mut cumulative = 0.0;
    for (i, r) in ratios.iter().enumerate() {
        cumulative += r;
        let reached = if target >= 1.0 {
            cumulative >= 1.0 - FULL_VARIANCE_TOLERANCE
        } else {
            cumulative >= target
        };
        if reached {
            return (i + 1, true);
        }
    }
    (ratios.len(), false)
}

/// Eigenpairs of a symmetric matrix sorted by descending variance.
///
/// The variance of each eigenvector is its Rayleigh quotient `vᵀ C v`,
/// clamped at zero against round-off.
fn ranked_eigenpairs(covariance: &Mat<f64>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let p = covariance.nrows();
    let eig = covariance
        .as_ref()
        .selfadjoint_eigendecomposition(faer::Side::Lower);
    let u = eig.u().to_owned();

    let mut pairs: Vec<(f64, Vec<f64>)> = (0..p)
        .map(|c| {
            let mut v: Vec<f64> = (0..p).map(|r| u[(r, c)]).collect();
            let variance = rayleigh_quotient(covariance, &v).max(0.0);
            flip_sign(&mut v);
            (variance, v)
        })
        .collect();

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    pairs.into_iter().unzip()
}

fn rayleigh_quotient(m: &Mat<f64>, v: &[f64]) -> f64 {
    let p = v.len();
    let norm_sq: f64 = v.iter().map(|x| x * x).sum();
    if norm_sq == 0.0 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..p {
        let row: f64 = (0..p).map(|j| m[(i, j)] * v[j]).sum();
        acc += v[i] * row;
    }
    acc / norm_sq
}

/// Make the largest-magnitude loading positive.
fn flip_sign(v: &mut [f64]) {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}

impl ReducerState {
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Cumulative explained-variance ratio of the retained components.
    pub fn cumulative_variance(&self) -> f64 {
        self.explained_variance_ratio.iter().sum()
    }

    pub fn component_names(&self) -> Vec<String> {
        (1..=self.n_components()).map(|i| format!("PC{}", i)).collect()
    }

    /// Project rows onto the retained components. Row count is unchanged and
    /// the result has one column per component.
    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix> {
        if features.ncols() != self.n_features() {
            return Err(PreprocessError::ShapeMismatch {
                expected: self.n_features(),
                actual: features.ncols(),
            });
        }

        let p = self.n_features();
        let data = Mat::from_fn(features.nrows(), self.n_components(), |i, c| {
            let loadings = &self.components[c];
            (0..p)
                .map(|j| (features.data[(i, j)] - self.mean[j]) * loadings[j])
                .sum()
        });
        FeatureMatrix::new(self.component_names(), data)
    }

    /// Check internal consistency, e.g. after deserializing.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let p = self.n_features();
        let k = self.n_components();
        if k == 0 {
            return Err("no components".to_string());
        }
        if let Some(bad) = self.components.iter().find(|c| c.len() != p) {
            return Err(format!(
                "component has {} loadings but model has {} features",
                bad.len(),
                p
            ));
        }
        if self.explained_variance.len() != k || self.explained_variance_ratio.len() != k {
            return Err(format!(
                "{} components but {} variances and {} ratios",
                k,
                self.explained_variance.len(),
                self.explained_variance_ratio.len()
            ));
        }
        Ok(())
    }
}
