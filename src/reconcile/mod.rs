//! Reconciliation of warehouse candidates against optimizer output
//!
//! [`reconcile`] joins a [`CandidateSet`] and an optional [`OptimizerResult`]
//! on the route key and produces an [`AnnotatedView`]:
//!
//! - one row per candidate, in candidate order, with every field untouched
//! - `selected` set exactly for candidates whose key the optimizer returned
//! - the optimizer's per-route figures attached beside, never merged into,
//!   the candidate fields
//! - the optimizer summary forwarded as-is
//!
//! Keys match by exact string equality. The function is pure: no I/O, no
//! logging, inputs borrowed immutably.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trazo::candidate::CandidateSet;
//! use trazo::optimizer::{ModelStatus, OptimizerResult, OptimizerRoute, OptimizerSummary};
//! use trazo::reconcile::reconcile;
//!
//! let candidates = CandidateSet::from_values(
//!     vec![json!({"ID_TRAZO": "R1"}), json!({"ID_TRAZO": "R2"})],
//!     "ID_TRAZO",
//! )
//! .unwrap();
//! let optimizer = OptimizerResult::new(
//!     vec![OptimizerRoute {
//!         route_key: "R2".to_string(),
//!         assigned_qty: 1,
//!         estimated_delivery_date: None,
//!         lead_time_days: 2,
//!         cost: 10.0,
//!         store_id: 5,
//!     }],
//!     OptimizerSummary::with_status(ModelStatus::Optimal),
//! );
//!
//! let view = reconcile(Some(&candidates), Some(&optimizer)).unwrap();
//! assert!(!view.rows[0].selected);
//! assert!(view.rows[1].selected);
//! ```

pub mod error;
pub mod view;

pub use error::{ReconcileError, ReconcileWarning};
pub use view::{AnnotatedRow, AnnotatedView};

use crate::candidate::CandidateSet;
use crate::optimizer::{OptimizerResult, OptimizerRoute};
use std::collections::{HashMap, HashSet};

/// Merge candidates with the optimizer's selection.
///
/// # Errors
/// - [`ReconcileError::InvalidInput`] when `candidates` is `None`
/// - [`ReconcileError::DuplicateKey`] on the first candidate key seen twice
/// - [`ReconcileError::DuplicateOptimizerKey`] on the first optimizer key seen twice
///
/// Optimizer routes with no candidate become
/// [`ReconcileWarning::UnmatchedOptimizerRoute`] entries, in optimizer order.
/// A result without a summary adds [`ReconcileWarning::MissingSummary`].
pub fn reconcile(
    candidates: Option<&CandidateSet>,
    optimizer: Option<&OptimizerResult>,
) -> Result<AnnotatedView, ReconcileError> {
    let candidates = candidates.ok_or(ReconcileError::InvalidInput)?;

    let mut candidate_keys: HashSet<&str> = HashSet::with_capacity(candidates.len());
    for row in candidates {
        if !candidate_keys.insert(row.route_key.as_str()) {
            return Err(ReconcileError::DuplicateKey(row.route_key.clone()));
        }
    }

    let Some(optimizer) = optimizer else {
        return Ok(AnnotatedView::unannotated(candidates));
    };

    let mut selection: HashMap<&str, &OptimizerRoute> =
        HashMap::with_capacity(optimizer.routes.len());
    for route in &optimizer.routes {
        if selection.insert(route.route_key.as_str(), route).is_some() {
            return Err(ReconcileError::DuplicateOptimizerKey(route.route_key.clone()));
        }
    }

    let rows = candidates
        .iter()
        .map(|row| match selection.get(row.route_key.as_str()) {
            Some(route) => AnnotatedRow::selected(row, route),
            None => AnnotatedRow::unselected(row),
        })
        .collect();

    let mut warnings: Vec<ReconcileWarning> = optimizer
        .routes
        .iter()
        .filter(|route| !candidate_keys.contains(route.route_key.as_str()))
        .map(|route| ReconcileWarning::UnmatchedOptimizerRoute {
            route_key: route.route_key.clone(),
        })
        .collect();
    if optimizer.summary.is_none() {
        warnings.push(ReconcileWarning::MissingSummary);
    }

    Ok(AnnotatedView {
        rows,
        summary: optimizer.summary.clone(),
        warnings,
    })
}
