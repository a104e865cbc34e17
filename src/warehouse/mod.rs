//! Candidate route sources
//!
//! A [`CandidateSource`] turns a sanitised [`CandidateQuery`] into a
//! [`CandidateSet`]. [`BigQuerySource`] runs the query against the warehouse;
//! [`SnapshotSource`] replays a saved JSON export.

pub mod bigquery;
pub mod error;
pub mod query;

pub use bigquery::BigQuerySource;
pub use error::WarehouseError;
pub use query::{CandidateQuery, TableRef};

use crate::candidate::CandidateSet;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Identifier for logging.
    fn name(&self) -> &str;

    /// Fetch every candidate row for the query. No retries.
    async fn fetch(&self, query: &CandidateQuery) -> Result<CandidateSet, WarehouseError>;
}

/// Candidates read from a saved JSON array of warehouse rows.
///
/// The file is taken as the answer to whatever query is asked.
pub struct SnapshotSource {
    path: PathBuf,
    route_key_column: String,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>, route_key_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            route_key_column: route_key_column.into(),
        }
    }
}

#[async_trait]
impl CandidateSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch(&self, query: &CandidateQuery) -> Result<CandidateSet, WarehouseError> {
        tracing::info!(
            path = %self.path.display(),
            sku = %query.sku(),
            cp = %query.cp(),
            "Loading candidate snapshot"
        );
        Ok(CandidateSet::load(&self.path, &self.route_key_column)?)
    }
}
