//! Señas Connect Core - Single-frame hand gesture classification
//!
//! This crate turns one hand's 21 landmarks into a gesture verdict:
//! - Landmark and observation types (fixed 21-point joint schema)
//! - Feature extraction (finger extension, thumb direction, pinch)
//! - Gesture catalog (ordered, immutable, built once)
//! - Rule matcher with a fixed acceptance threshold
//! - Prediction service with latency measurement
//!
//! Every frame is classified independently. Nothing here performs I/O.

pub mod error;
pub mod landmark;
pub mod features;
pub mod catalog;
pub mod matcher;
pub mod prediction;
pub mod synthetic;

pub use error::*;
pub use landmark::*;
pub use features::*;
pub use catalog::*;
pub use matcher::*;
pub use prediction::*;
