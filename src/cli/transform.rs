//! Apply previously saved artifacts to new rows

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use polars::prelude::*;

use super::args::default_transform_output;
use crate::pipeline::{
    check_compatible, load_dataset, load_manifest, load_reducer, load_scaler, FeatureMatrix,
};
use crate::utils::{create_spinner, finish_with_success};

/// Locations of the artifacts written by a fitting run.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub pca: PathBuf,
    pub manifest: PathBuf,
}

/// Result of a transform run.
#[derive(Debug)]
pub struct TransformOutcome {
    pub output: PathBuf,
    pub projected: FeatureMatrix,
}

/// Load the artifacts, bring `input` into the training feature space and
/// write its principal components to `output`.
///
/// # Arguments
/// * `input` - CSV or Parquet file with the same columns as the training data
///   (the target column may be absent)
/// * `output` - Optional output path. If not provided, uses input path with '_pca.csv' suffix
/// * `artifacts` - Scaler, PCA and manifest paths
/// * `infer_schema_length` - Number of rows to use for schema inference
pub fn run_transform(
    input: &Path,
    output: Option<&Path>,
    artifacts: &ArtifactPaths,
    infer_schema_length: usize,
) -> Result<TransformOutcome> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_transform_output(input));

    println!("\n {} Applying saved transforms", style("◆").cyan().bold());
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Output: {}", style(output_path.display()).dim());
    println!();

    let spinner = create_spinner("Loading artifacts...");
    let manifest = load_manifest(&artifacts.manifest)
        .with_context(|| format!("Failed to load manifest: {}", artifacts.manifest.display()))?;
    let scaler = load_scaler(&artifacts.scaler)
        .with_context(|| format!("Failed to load scaler: {}", artifacts.scaler.display()))?;
    let reducer = load_reducer(&artifacts.pca)
        .with_context(|| format!("Failed to load PCA transform: {}", artifacts.pca.display()))?;
    check_compatible(&manifest, &scaler, &reducer)?;
    finish_with_success(
        &spinner,
        &format!(
            "Artifacts loaded ({} features → {} components)",
            scaler.n_features(),
            reducer.n_components()
        ),
    );

    let spinner = create_spinner("Transforming rows...");
    let df = load_dataset(input, infer_schema_length)?;
    let features = manifest
        .prepare_features(&df)
        .with_context(|| format!("Failed to prepare features from {}", input.display()))?;
    let scaled = scaler.transform(&features)?;
    let projected = reducer.transform(&scaled)?;
    finish_with_success(
        &spinner,
        &format!("Projected {} row(s)", projected.nrows()),
    );

    let mut out_df = projected.to_dataframe()?;
    save_dataset(&mut out_df, &output_path)?;

    println!();
    println!(
        "   {} rows × {} components",
        style(projected.nrows()).yellow(),
        style(projected.ncols()).yellow()
    );
    println!(" {} Transform complete!", style("✓").green().bold());

    Ok(TransformOutcome {
        output: output_path,
        projected,
    })
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
