//! Resampling hypothesis tests.
//!
//! - a generic permutation-style test parameterized by a statistic and a null model
//! - the serial-correlation specialization
//! - the three-way serial-correlation check run by the pipeline

pub mod driver;
pub mod permutation;
pub mod serial;

pub use driver::*;
pub use permutation::*;
pub use serial::*;
