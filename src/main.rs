//! scalepca: Tabular Preprocessing CLI Tool
//!
//! Imputes, encodes, splits, standardizes and PCA-reduces a dataset, then
//! saves the fitted scaler and PCA transform for later reuse.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use scalepca::cli::{self, ArtifactPaths, Cli, Commands};
use scalepca::pipeline::{
    apply_encoder, apply_imputer, extract_features, fit_encoder, fit_imputer, load_dataset,
    missing_counts, save_manifest, save_reducer, save_scaler, split_indices, validate_target,
    DatasetStats, ImputeMode, Manifest, ManifestParams, Pca, StandardScaler,
};
use scalepca::report::RunSummary;
use scalepca::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Transform {
                input,
                output,
                scaler,
                pca,
                manifest,
                infer_schema_length,
            } => {
                let artifacts = ArtifactPaths {
                    scaler: scaler.clone(),
                    pca: pca.clone(),
                    manifest: manifest.clone(),
                };
                cli::run_transform(input, output.as_deref(), &artifacts, *infer_schema_length)
                    .map(|_| ())
            }
        };
    }

    let impute_mode = cli.impute_mode();
    let impute_mode_label = impute_mode.to_string();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input: &cli.input,
        target: &cli.target,
        scaler_output: &cli.scaler_output,
        pca_output: &cli.pca_output,
        manifest_output: cli.manifest_path(),
        test_size: cli.test_size,
        seed: cli.seed,
        variance_target: cli.variance_target,
        impute_mode: &impute_mode_label,
    });

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let df = load_dataset(&cli.input, cli.infer_schema_length)?;
    validate_target(&df, &cli.target)?;
    finish_with_success(&spinner, "Dataset loaded");

    let stats = DatasetStats::of(&df);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.cols);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);

    let mut summary = RunSummary::new(stats.rows, stats.cols);
    summary.variance_target = cli.variance_target;
    let elapsed = step_start.elapsed();
    summary.record_step("load", elapsed);
    print_step_time(elapsed);

    // Step 2: Mean imputation. Splitting depends only on the row count, so in
    // training-rows mode the partition is computed here and reused in step 4.
    print_step_header(2, "Impute Missing Values");
    let step_start = Instant::now();
    for (column, count) in missing_counts(&df).iter().filter(|(_, n)| *n > 0) {
        println!(
            "      {}: {} missing ({:.1}%)",
            column,
            style(count).yellow(),
            *count as f64 / df.height().max(1) as f64 * 100.0
        );
    }
    let early_split = match impute_mode {
        ImputeMode::TrainingRows => Some(split_indices(df.height(), cli.test_size, cli.seed)?),
        ImputeMode::FullDataset => None,
    };
    let imputation = fit_imputer(&df, early_split.as_ref().map(|s| s.train.as_slice()))?;
    let (df, filled) = apply_imputer(&df, &imputation)?;
    if impute_mode == ImputeMode::FullDataset {
        print_info("Means computed from the full dataset (test rows included)");
    }
    if filled == 0 {
        print_info("No missing numeric values");
    } else {
        print_count(
            "missing value(s) filled with column means",
            filled,
            Some(&format!("({} numeric columns)", imputation.means.len())),
        );
    }
    summary.imputed_cells = filled;
    let elapsed = step_start.elapsed();
    summary.record_step("impute", elapsed);
    print_step_time(elapsed);

    // Step 3: Label encoding
    print_step_header(3, "Encode Categorical Columns");
    let step_start = Instant::now();
    let encoding = fit_encoder(&df)?;
    let df = apply_encoder(&df, &encoding)?;
    if encoding.is_empty() {
        print_info("No categorical columns");
    } else {
        for column in &encoding.columns {
            println!(
                "      {} → {} code(s)",
                column.column,
                style(column.classes.len()).yellow()
            );
        }
        print_success("Categorical columns encoded");
    }
    summary.encoded_columns = encoding.column_names();
    let elapsed = step_start.elapsed();
    summary.record_step("encode", elapsed);
    print_step_time(elapsed);

    // Step 4: Train/test split
    print_step_header(4, "Train/Test Split");
    let step_start = Instant::now();
    let (features, target) = extract_features(&df, &cli.target)?;
    let split = match early_split {
        Some(split) => split,
        None => split_indices(features.nrows(), cli.test_size, cli.seed)?,
    };
    let (x_train, x_test) = split.apply_rows(&features)?;
    let (y_train, y_test) = split.apply_values(&target)?;
    println!(
        "      Train: {} rows, Test: {} rows, Features: {}",
        style(x_train.nrows()).yellow(),
        style(x_test.nrows()).yellow(),
        style(features.ncols()).yellow()
    );
    debug_assert_eq!(y_train.len(), x_train.nrows());
    debug_assert_eq!(y_test.len(), x_test.nrows());
    summary.features = features.ncols();
    summary.train_rows = x_train.nrows();
    summary.test_rows = x_test.nrows();
    let elapsed = step_start.elapsed();
    summary.record_step("split", elapsed);
    print_step_time(elapsed);

    // Step 5: Standardization (fit on training rows only)
    print_step_header(5, "Standardize Features");
    let step_start = Instant::now();
    let (scaler, x_train_scaled) = StandardScaler::fit_transform(&x_train)?;
    let x_test_scaled = scaler.transform(&x_test)?;
    if scaler.constant_features.is_empty() {
        print_success("Features standardized with training statistics");
    } else {
        print_warning(&format!(
            "{} constant feature(s) centred but not rescaled: {}",
            scaler.constant_features.len(),
            scaler.constant_features.join(", ")
        ));
    }
    summary.constant_features = scaler.constant_features.clone();
    let elapsed = step_start.elapsed();
    summary.record_step("scale", elapsed);
    print_step_time(elapsed);

    // Step 6: PCA (fit on training rows only)
    print_step_header(6, "Principal Component Analysis");
    let step_start = Instant::now();
    let spinner = create_spinner("Computing principal components...");
    let (reducer, x_train_pca) = Pca::fit_transform(&x_train_scaled, cli.variance_target)?;
    let x_test_pca = reducer.transform(&x_test_scaled)?;
    let message = format!(
        "{} component(s) explain {:.1}% of variance",
        reducer.n_components(),
        reducer.cumulative_variance() * 100.0
    );
    if reducer.target_met {
        finish_with_success(&spinner, &message);
    } else {
        finish_with_warning(&spinner, &message);
        print_warning(&format!(
            "Variance target {:.1}% not reachable; keeping all {} available component(s)",
            cli.variance_target * 100.0,
            reducer.n_components()
        ));
    }
    for (i, ratio) in reducer.explained_variance_ratio.iter().enumerate() {
        println!("      PC{:<3} {:>6.2}%", i + 1, ratio * 100.0);
    }
    println!(
        "      Projected shapes: train {:?}, test {:?}",
        x_train_pca.shape(),
        x_test_pca.shape()
    );
    summary.components = reducer.n_components();
    summary.cumulative_variance = reducer.cumulative_variance();
    summary.variance_target_met = reducer.target_met;
    let elapsed = step_start.elapsed();
    summary.record_step("pca", elapsed);
    print_step_time(elapsed);

    // Step 7: Persist artifacts
    print_step_header(7, "Save Artifacts");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing artifacts...");
    save_scaler(&scaler, &cli.scaler_output)
        .with_context(|| format!("Failed to save scaler: {}", cli.scaler_output.display()))?;
    save_reducer(&reducer, &cli.pca_output)
        .with_context(|| format!("Failed to save PCA: {}", cli.pca_output.display()))?;
    summary.artifacts = vec![cli.scaler_output.clone(), cli.pca_output.clone()];

    if let Some(manifest_path) = cli.manifest_path() {
        let manifest = Manifest::new(
            ManifestParams {
                target_column: cli.target.clone(),
                feature_columns: features.names.clone(),
                test_size: cli.test_size,
                seed: cli.seed,
            },
            imputation,
            encoding,
            &reducer,
        );
        save_manifest(&manifest, manifest_path)
            .with_context(|| format!("Failed to save manifest: {}", manifest_path.display()))?;
        summary.artifacts.push(manifest_path.to_path_buf());
    }
    finish_with_success(
        &spinner,
        &format!("Saved {} artifact(s)", summary.artifacts.len()),
    );
    let elapsed = step_start.elapsed();
    summary.record_step("save", elapsed);
    print_step_time(elapsed);

    summary.display();
    print_completion();

    Ok(())
}
