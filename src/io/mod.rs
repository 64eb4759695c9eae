//! Input/output helpers.
//!
//! - transaction CSV ingest + validation (`ingest`)
//! - fit and test-result exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
