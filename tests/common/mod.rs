//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scalepca::pipeline::FeatureMatrix;
use std::path::PathBuf;
use tempfile::TempDir;

pub const TARGET: &str = "Life expectancy";

/// Create a synthetic country-health dataset
///
/// This DataFrame includes:
/// - `Country`: categorical, 10 distinct values
/// - `Status`: categorical, "Developed" / "Developing"
/// - `GDP`: numeric, every 20th row missing (5%)
/// - `Schooling`: numeric, correlated with GDP
/// - `Life expectancy`: numeric target
pub fn create_health_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut country = Vec::with_capacity(rows);
    let mut status = Vec::with_capacity(rows);
    let mut gdp = Vec::with_capacity(rows);
    let mut schooling = Vec::with_capacity(rows);
    let mut life = Vec::with_capacity(rows);

    for i in 0..rows {
        let developed = rng.gen_bool(0.3);
        let base_gdp = if developed { 40_000.0 } else { 8_000.0 };
        let g: f64 = base_gdp + rng.gen_range(-5_000.0..5_000.0);
        let s = 6.0 + g / 4_000.0 + rng.gen_range(-1.0..1.0);

        country.push(format!("Country{}", i % 10));
        status.push(if developed { "Developed" } else { "Developing" }.to_string());
        gdp.push(if i % 20 == 7 { None } else { Some(g) });
        schooling.push(s);
        life.push(50.0 + 2.0 * s + rng.gen_range(-3.0..3.0));
    }

    df! {
        "Country" => country,
        "Status" => status,
        "GDP" => gdp,
        "Schooling" => schooling,
        TARGET => life,
    }
    .unwrap()
}

/// Create a small DataFrame with known missing value patterns
pub fn create_missing_test_dataframe() -> DataFrame {
    df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial" => [Some(1.0f64), None, Some(3.0), None, Some(8.0)],
        "col_int" => [Some(2i64), Some(4), None, Some(6), Some(8)],
        "label" => ["a", "b", "a", "c", "b"],
        "target" => [10.0f64, 20.0, 30.0, 40.0, 50.0],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Random feature matrix with a planted low-rank structure
pub fn create_random_features(rows: usize, cols: usize, seed: u64) -> FeatureMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let latent: Vec<(f64, f64)> = (0..rows)
        .map(|_| (rng.gen_range(-3.0..3.0), rng.gen_range(-1.0..1.0)))
        .collect();

    let columns: Vec<Vec<f64>> = (0..cols)
        .map(|j| {
            let w1 = 1.0 + j as f64 * 0.5;
            let w2 = if j % 2 == 0 { 1.0 } else { -1.0 };
            latent
                .iter()
                .map(|(a, b)| w1 * a + w2 * b + rng.gen_range(-0.1..0.1))
                .collect()
        })
        .collect();

    let names = (0..cols).map(|j| format!("f{}", j)).collect();
    FeatureMatrix::from_columns(names, &columns).unwrap()
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Assert that a feature matrix has expected shape
pub fn assert_shape(fm: &FeatureMatrix, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = fm.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{}: expected {} ± {}, got {}",
        what,
        expected,
        tol,
        actual
    );
}
