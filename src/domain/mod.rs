//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records and their grouping (`Transaction`, `DailySeries`)
//! - model descriptors and fit diagnostics (`ModelKind`, `FitQuality`, `Coefficient`)
//! - run configuration (`AnalysisConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
