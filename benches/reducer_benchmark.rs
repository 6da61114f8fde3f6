//! Benchmark scaler and PCA fitting for varying feature counts
//!
//! Run with: cargo bench --bench reducer_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;

use scalepca::pipeline::{FeatureMatrix, Pca, StandardScaler};

/// Generate features driven by a handful of latent factors plus noise
fn generate_features(n_rows: usize, n_features: usize, seed: u64) -> FeatureMatrix {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let n_latent = 3;

    let latent: Vec<Vec<f64>> = (0..n_latent)
        .map(|_| (0..n_rows).map(|_| rng.gen::<f64>() * 10.0).collect())
        .collect();

    let columns: Vec<Vec<f64>> = (0..n_features)
        .map(|j| {
            let factor = &latent[j % n_latent];
            let weight = 0.5 + (j as f64) / n_features as f64;
            factor
                .iter()
                .map(|v| weight * v + rng.gen::<f64>())
                .collect()
        })
        .collect();

    let names = (0..n_features).map(|j| format!("feature_{}", j)).collect();
    FeatureMatrix::from_columns(names, &columns).expect("Failed to build feature matrix")
}

/// Benchmark scaler fit + transform for varying column counts
fn benchmark_scaler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaler_fit_transform");
    group.sample_size(30);

    let n_rows = 10_000;
    for n_cols in [10, 50, 100] {
        let features = generate_features(n_rows, n_cols, 42);
        group.throughput(Throughput::Elements((n_rows * n_cols) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_cols), &features, |b, f| {
            b.iter(|| StandardScaler::fit_transform(black_box(f)).expect("scaler fit failed"))
        });
    }

    group.finish();
}

/// Benchmark PCA fitting on standardized features for varying column counts
fn benchmark_pca(c: &mut Criterion) {
    let mut group = c.benchmark_group("pca_fit");
    group.sample_size(20);

    let n_rows = 5_000;
    for n_cols in [10, 50, 100, 200] {
        let features = generate_features(n_rows, n_cols, 7);
        let (_, scaled) = StandardScaler::fit_transform(&features).expect("scaler fit failed");
        group.bench_with_input(BenchmarkId::from_parameter(n_cols), &scaled, |b, s| {
            b.iter(|| Pca::fit(black_box(s), 0.8).expect("PCA fit failed"))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scaler, benchmark_pca);
criterion_main!(benches);
