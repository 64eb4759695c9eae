//! Regression fitting and the products derived from a fit.
//!
//! Responsibilities:
//!
//! - fit the linear and quadratic time-trend models (OLS)
//! - bin residuals into percentile lines over time
//! - bootstrap prediction bands over a forward time grid (parallel)

pub mod fitter;
pub mod residuals;
pub mod simulate;

pub use fitter::*;
pub use residuals::*;
pub use simulate::*;
