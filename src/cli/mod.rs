//! CLI module - argument parsing and the transform subcommand

mod args;
pub mod transform;

pub use args::*;
pub use transform::{run_transform, save_dataset, ArtifactPaths, TransformOutcome};
