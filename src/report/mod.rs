//! Report module - summarizing a preprocessing run

pub mod summary;

pub use summary::*;
