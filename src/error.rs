//! Error types for Marginalia
//!
//! Ordering and merging never fail. Errors only come from the edges:
//! configuration values and decoding annotation batches.

use thiserror::Error;

/// Library-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
