//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::ImputeMode;

/// scalepca - Impute, encode, standardize and PCA-reduce a tabular dataset,
/// saving the fitted scaler and PCA transform for later reuse
#[derive(Parser, Debug)]
#[command(name = "scalepca")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = "nilu.csv")]
    pub input: PathBuf,

    /// Target column name. Must be numeric; it is separated from the
    /// features before scaling and never enters the PCA.
    #[arg(short, long, default_value = "Life expectancy")]
    pub target: String,

    /// Where to write the fitted scaler
    #[arg(long, default_value = "scaler.bin")]
    pub scaler_output: PathBuf,

    /// Where to write the fitted PCA transform
    #[arg(long, default_value = "pca.bin")]
    pub pca_output: PathBuf,

    /// Where to write the run manifest (column order, imputation means,
    /// encoding maps) needed to apply the transforms to new data
    #[arg(long, default_value = "manifest.json")]
    pub manifest_output: PathBuf,

    /// Skip writing the manifest
    #[arg(long, default_value = "false")]
    pub no_manifest: bool,

    /// Fraction of rows held out as the test partition
    #[arg(long, default_value = "0.2", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Minimum cumulative explained-variance ratio the kept components must reach
    #[arg(long, default_value = "0.8", value_parser = validate_variance_target)]
    pub variance_target: f64,

    /// Compute imputation means from the training rows only.
    /// By default means come from the full dataset before splitting.
    #[arg(long, default_value = "false")]
    pub impute_after_split: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply saved artifacts to a new CSV or Parquet file and write its
    /// principal components
    Transform {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Output file path (optional, defaults to input with '_pca.csv' suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fitted scaler written by a previous run
        #[arg(long, default_value = "scaler.bin")]
        scaler: PathBuf,

        /// Fitted PCA transform written by a previous run
        #[arg(long, default_value = "pca.bin")]
        pca: PathBuf,

        /// Manifest written by a previous run
        #[arg(long, default_value = "manifest.json")]
        manifest: PathBuf,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    pub fn impute_mode(&self) -> ImputeMode {
        if self.impute_after_split {
            ImputeMode::TrainingRows
        } else {
            ImputeMode::FullDataset
        }
    }

    /// Manifest destination, or None when disabled.
    pub fn manifest_path(&self) -> Option<&Path> {
        if self.no_manifest {
            None
        } else {
            Some(self.manifest_output.as_path())
        }
    }
}

/// Default output for the transform subcommand: next to the input with a
/// '_pca.csv' suffix.
pub fn default_transform_output(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}_pca.csv", stem))
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

/// Validator for variance_target parameter
fn validate_variance_target(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "variance_target must be in (0.0, 1.0], got {}",
            value
        ))
    }
}
