//! Reporting utilities: terminal summaries for fits and serial-correlation tests.

pub mod format;

pub use format::*;
