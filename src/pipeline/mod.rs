//! Pipeline module - the preprocessing stages, in run order

pub mod encoder;
pub mod error;
pub mod features;
pub mod imputer;
pub mod loader;
pub mod manifest;
pub mod persist;
pub mod reducer;
pub mod scaler;
pub mod splitter;

pub use encoder::*;
pub use error::{PreprocessError, Result};
pub use features::*;
pub use imputer::*;
pub use loader::*;
pub use manifest::*;
pub use persist::*;
pub use reducer::*;
pub use scaler::*;
pub use splitter::*;
