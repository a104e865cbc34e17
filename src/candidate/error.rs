//! Candidate ingestion error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning warehouse records into a [`CandidateSet`](super::CandidateSet).
#[derive(Error, Debug)]
pub enum CandidateError {
    /// A record has no value (or a null value) in the route key column.
    #[error("Row {row} has no value in route key column '{column}'")]
    MissingRouteKey { row: usize, column: String },

    /// The route key column holds something other than a string or number.
    #[error("Row {row} has a non-scalar route key in column '{column}': {value}")]
    InvalidRouteKey {
        row: usize,
        column: String,
        value: String,
    },

    /// A record is not a JSON object.
    #[error("Row {row} is not a record object: {value}")]
    NotARecord { row: usize, value: String },

    /// A snapshot file could not be read.
    #[error("Failed to read candidate file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file is not a JSON array of objects.
    #[error("Failed to parse candidate file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
