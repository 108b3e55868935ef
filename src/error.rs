//! Error types for the casegrid engine.
//!
//! The engine's query operations are total: empty input and non-positive
//! radii yield empty results instead of errors. `CasegridError` only
//! surfaces from the validating constructors used by upstream ingestion.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CasegridError>;

/// Errors produced by the casegrid engine.
#[derive(Debug, Error)]
pub enum CasegridError {
    /// Input failed validation (non-finite or out-of-range coordinates,
    /// invalid configuration values).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
