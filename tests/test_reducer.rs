//! Unit tests for PCA reduction

use scalepca::pipeline::{FeatureMatrix, Pca, PreprocessError, StandardScaler};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn scaled_fixture(rows: usize, cols: usize, seed: u64) -> FeatureMatrix {
    let features = create_random_features(rows, cols, seed);
    StandardScaler::fit_transform(&features).unwrap().1
}

#[test]
fn test_keeps_minimum_components_for_target() {
    let scaled = scaled_fixture(120, 6, 21);
    let state = Pca::fit(&scaled, 0.8).unwrap();

    let k = state.n_components();
    assert!(state.target_met);
    assert!(state.cumulative_variance() >= 0.8 - 1e-10);

    // One component fewer would fall short of the target
    let short: f64 = state.all_variance_ratios[..k - 1].iter().sum();
    assert!(short < 0.8, "k={} is not minimal: first {} explain {}", k, k - 1, short);
}

#[test]
fn test_ratios_descending_and_sum_to_one() {
    let scaled = scaled_fixture(60, 5, 22);
    let state = Pca::fit(&scaled, 1.0).unwrap();

    for pair in state.all_variance_ratios.windows(2) {
        assert!(pair[0] + 1e-12 >= pair[1], "Ratios must be sorted descending");
    }
    assert_close(state.all_variance_ratios.iter().sum(), 1.0, 1e-9, "ratio sum");
    assert_eq!(state.n_components(), 5);
}

#[test]
fn test_planted_structure_needs_few_components() {
    // Two latent factors drive all eight columns
    let scaled = scaled_fixture(200, 8, 23);
    let state = Pca::fit(&scaled, 0.8).unwrap();
    assert!(state.n_components() <= 2, "Expected <= 2 components, got {}", state.n_components());
}

#[test]
fn test_transform_shape() {
    let scaled = scaled_fixture(50, 4, 24);
    let state = Pca::fit(&scaled, 0.8).unwrap();
    let projected = state.transform(&scaled).unwrap();

    assert_shape(&projected, 50, state.n_components());
    assert_eq!(projected.names[0], "PC1");
}

#[test]
fn test_transform_is_repeatable() {
    let scaled = scaled_fixture(50, 4, 25);
    let (state, fitted) = Pca::fit_transform(&scaled, 0.8).unwrap();
    let again = state.transform(&scaled).unwrap();

    for i in 0..fitted.nrows() {
        for j in 0..fitted.ncols() {
            assert_close(again.get(i, j), fitted.get(i, j), 1e-12, "re-projection");
        }
    }
}

#[test]
fn test_components_are_orthonormal() {
    let scaled = scaled_fixture(80, 5, 26);
    let state = Pca::fit(&scaled, 1.0).unwrap();

    for a in 0..state.n_components() {
        for b in 0..state.n_components() {
            let dot: f64 = state.components[a]
                .iter()
                .zip(state.components[b].iter())
                .map(|(x, y)| x * y)
                .sum();
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_close(dot, expected, 1e-9, &format!("<c{}, c{}>", a, b));
        }
    }
}

#[test]
fn test_projected_variance_matches_explained_variance() {
    let scaled = scaled_fixture(100, 4, 27);
    let (state, projected) = Pca::fit_transform(&scaled, 1.0).unwrap();

    for c in 0..state.n_components() {
        let column = projected.column(c);
        let m = mean(&column);
        let sample_var =
            column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (column.len() - 1) as f64;
        assert_close(sample_var, state.explained_variance[c], 1e-8, "component variance");
    }
}

#[test]
fn test_sign_convention_largest_loading_positive() {
    let scaled = scaled_fixture(40, 4, 28);
    let state = Pca::fit(&scaled, 1.0).unwrap();

    for component in &state.components {
        let pivot = component
            .iter()
            .copied()
            .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
        assert!(pivot > 0.0);
    }
}

#[test]
fn test_rank_deficient_limits_available_components() {
    // Three rows, five columns: at most 3 directions are available
    let features = FeatureMatrix::from_columns(
        (0..5).map(|j| format!("f{}", j)).collect(),
        &[
            vec![1.0, 2.0, 4.0],
            vec![0.0, 1.0, 0.0],
            vec![3.0, 1.0, 2.0],
            vec![5.0, 5.0, 6.0],
            vec![1.0, 0.0, 1.0],
        ],
    )
    .unwrap();

    let state = Pca::fit(&features, 1.0).unwrap();
    assert_eq!(state.all_variance_ratios.len(), 3);
    // Centred rows span at most two directions
    assert!(state.n_components() <= 2);
    assert!(state.target_met);
}

#[test]
fn test_two_rows_have_one_direction() {
    let features = FeatureMatrix::from_columns(
        vec!["a".to_string(), "b".to_string()],
        &[vec![1.0, 2.0], vec![5.0, 1.0]],
    )
    .unwrap();

    let state = Pca::fit(&features, 1.0).unwrap();
    assert_eq!(state.n_components(), 1);
    assert_close(state.explained_variance_ratio[0], 1.0, 1e-9, "single direction");
}

#[test]
fn test_zero_total_variance_errors() {
    let features = FeatureMatrix::from_columns(
        vec!["a".to_string(), "b".to_string()],
        &[vec![0.0; 5], vec![0.0; 5]],
    )
    .unwrap();

    assert!(matches!(
        Pca::fit(&features, 0.8),
        Err(PreprocessError::ZeroTotalVariance)
    ));
}

#[test]
fn test_invalid_variance_target_errors() {
    let scaled = scaled_fixture(20, 3, 29);
    assert!(matches!(
        Pca::fit(&scaled, 0.0),
        Err(PreprocessError::InvalidVarianceTarget(_))
    ));
    assert!(matches!(
        Pca::fit(&scaled, 1.5),
        Err(PreprocessError::InvalidVarianceTarget(_))
    ));
}

#[test]
fn test_single_row_errors() {
    let features = create_random_features(1, 3, 30);
    assert!(matches!(
        Pca::fit(&features, 0.8),
        Err(PreprocessError::EmptyInput(_))
    ));
}

#[test]
fn test_width_mismatch_errors() {
    let scaled = scaled_fixture(30, 4, 31);
    let state = Pca::fit(&scaled, 0.8).unwrap();
    let narrow = create_random_features(5, 3, 31);

    assert!(matches!(
        state.transform(&narrow),
        Err(PreprocessError::ShapeMismatch { expected: 4, actual: 3 })
    ));
}
