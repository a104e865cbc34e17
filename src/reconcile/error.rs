//! Reconciliation faults and warnings

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Conditions that stop a reconciliation. No partial view is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The candidate set is missing.
    #[error("Invalid input: no candidate set to reconcile")]
    InvalidInput,

    /// Two candidate rows share a route key, so a match would be ambiguous.
    #[error("Duplicate route key '{0}' in candidate set")]
    DuplicateKey(String),

    /// The optimizer returned the same route key twice.
    #[error("Duplicate route key '{0}' in optimizer result")]
    DuplicateOptimizerKey(String),
}

impl ReconcileError {
    /// The offending route key, when there is one.
    pub fn route_key(&self) -> Option<&str> {
        match self {
            ReconcileError::InvalidInput => None,
            ReconcileError::DuplicateKey(key) | ReconcileError::DuplicateOptimizerKey(key) => {
                Some(key)
            }
        }
    }
}

/// Non-fatal conditions reported alongside a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconcileWarning {
    /// The optimizer picked a route the candidate query did not return.
    UnmatchedOptimizerRoute { route_key: String },

    /// The optimizer sent routes but no summary.
    MissingSummary,
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileWarning::UnmatchedOptimizerRoute { route_key } => write!(
                f,
                "Optimizer route '{}' is not among the candidate routes",
                route_key
            ),
            ReconcileWarning::MissingSummary => {
                write!(f, "Optimizer response has no summary; selected routes are still marked")
            }
        }
    }
}
