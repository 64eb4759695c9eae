//! Chart rendering.
//!
//! Charts are written as standalone SVG files next to the other run
//! artifacts; nothing here prints to the terminal.

pub mod charts;

pub use charts::*;
