//! scalepca: Tabular Preprocessing Library
//!
//! Loads a dataset, imputes missing numeric values with column means,
//! label-encodes text columns, splits rows into train/test partitions,
//! standardizes features and reduces them with PCA to the fewest components
//! reaching a cumulative explained-variance target. The fitted scaler and PCA
//! transform are persisted, together with a manifest of the preprocessing,
//! so new rows can be projected into the same space.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
