//! Wire decoding errors

use serde_json::error::Category;
use thiserror::Error;

use senas_core::GestureError;

/// Errors raised while decoding client payloads
#[derive(Error, Debug)]
pub enum WireError {
    /// Payload is not JSON at all
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// JSON that does not fit the message schema
    #[error("Invalid payload: {0}")]
    Schema(String),

    /// Schema-valid hand with an unusable landmark set
    #[error("Invalid hand {hand}: {source}")]
    Shape {
        hand: usize,
        #[source]
        source: GestureError,
    },

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for WireError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Syntax | Category::Eof => WireError::InvalidJson(e.to_string()),
            Category::Data => WireError::Schema(e.to_string()),
            Category::Io => WireError::Encode(e.to_string()),
        }
    }
}

/// Result type for wire operations
pub type WireResult<T> = Result<T, WireError>;
