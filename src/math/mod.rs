//! Mathematical utilities: least squares, descriptive statistics, and seeded
//! resampling.

pub mod ols;
pub mod resample;
pub mod stats;

pub use ols::*;
pub use resample::*;
pub use stats::*;
