//! Error types for gesture classification

use thiserror::Error;

/// Core classification errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    // Observation errors
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Non-finite coordinate at landmark {index}")]
    NonFiniteCoordinate { index: usize },

    #[error("Hand confidence out of range: {0}")]
    InvalidConfidence(f32),

    // Catalog errors
    #[error("Duplicate gesture id: {0}")]
    DuplicateGesture(String),

    #[error("Gesture {0} defines both a finger pattern and a special tag")]
    AmbiguousDefinition(String),

    #[error("Gesture {0} defines neither a finger pattern nor a special tag")]
    EmptyDefinition(String),

    #[error("Gesture catalog is empty")]
    EmptyCatalog,
}

/// Result type for classification operations
pub type GestureResult<T> = Result<T, GestureError>;
