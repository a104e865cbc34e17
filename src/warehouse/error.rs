//! Error types for warehouse queries.

use crate::candidate::CandidateError;
use thiserror::Error;

/// Errors that can occur while fetching candidate routes.
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// A query parameter failed sanitisation.
    #[error("Invalid value for '{name}': '{value}' must be a numeric code")]
    InvalidParameter { name: &'static str, value: String },

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Warehouse request timeout after {0}ms")]
    Timeout(u64),

    /// Warehouse returned a non-2xx status.
    #[error("Warehouse error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The query ran but did not finish within the server-side timeout.
    #[error("Warehouse query did not complete (job {job_id})")]
    Incomplete { job_id: String },

    /// Response doesn't match the expected format.
    #[error("Invalid warehouse response: {0}")]
    InvalidResponse(String),

    /// Rows could not be turned into candidates.
    #[error(transparent)]
    Candidate(#[from] CandidateError),
}
