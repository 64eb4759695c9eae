//! Data access: grouping transactions into daily series, and a synthetic
//! transaction generator.

pub mod grouping;
pub mod sample;

pub use grouping::*;
pub use sample::*;
