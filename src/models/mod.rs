//! Time-trend model implementations.
//!
//! Models are implemented as small, pure functions so that fitting and
//! simulation code can stay generic over the model kind.

pub mod model;

pub use model::*;
