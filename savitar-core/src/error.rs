//! Error types for Savitar operations.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using Savitar's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during Savitar operations.
///
/// Every fallible call returns exactly one of these; nothing is retried or
/// swallowed internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Attempted to insert an id that is already stored.
    #[error("vector already exists: {0}")]
    AlreadyExists(String),

    /// Vector with the given id was not found.
    #[error("vector not found: {0}")]
    NotFound(String),

    /// Two vectors (or a vector and the configured dimension) differ in length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Cosine similarity is undefined for a zero-norm vector.
    #[error("zero vector detected")]
    ZeroVector,

    /// Malformed request, e.g. `top_n == 0` or an empty query.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The router has no partition to send a request to.
    #[error("no partition available")]
    NoPartitionAvailable,

    /// Vector data cannot be empty.
    #[error("empty vector not allowed")]
    EmptyVector,

    /// Vector data contains NaN or an infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// A search did not finish before its deadline.
    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    /// A fan-out task panicked or was cancelled.
    #[error("search task failed: {0}")]
    TaskFailed(String),

    /// Configuration could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),
}
