//! Error types for optimizer calls.

use thiserror::Error;

/// Errors that can occur while building or sending an optimizer request.
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// Request rejected before it was sent.
    #[error("Invalid optimizer request: {0}")]
    InvalidRequest(String),

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Optimizer request timeout after {0}ms")]
    Timeout(u64),

    /// Service returned a non-2xx status.
    #[error("Optimizer error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Service answered 2xx with an `error` payload.
    #[error("Optimizer reported an error: {0}")]
    Service(String),

    /// Response doesn't match the expected format.
    #[error("Invalid optimizer response: {0}")]
    InvalidResponse(String),
}
