//! Operator session state
//!
//! Holds the latest candidate and optimizer snapshots. Either can be replaced
//! on its own; [`Session::view`] re-runs reconciliation over whatever is
//! current without re-fetching anything.

use crate::candidate::CandidateSet;
use crate::optimizer::OptimizerResult;
use crate::reconcile::{reconcile, AnnotatedView, ReconcileError};

#[derive(Debug, Default, Clone)]
pub struct Session {
    candidates: Option<CandidateSet>,
    optimizer: Option<OptimizerResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate snapshot, returning the previous one.
    pub fn replace_candidates(&mut self, candidates: CandidateSet) -> Option<CandidateSet> {
        self.candidates.replace(candidates)
    }

    /// Replace the optimizer snapshot, returning the previous one.
    pub fn replace_optimizer(&mut self, result: OptimizerResult) -> Option<OptimizerResult> {
        self.optimizer.replace(result)
    }

    /// Drop the optimizer snapshot, e.g. after a failed call.
    pub fn clear_optimizer(&mut self) -> Option<OptimizerResult> {
        self.optimizer.take()
    }

    pub fn candidates(&self) -> Option<&CandidateSet> {
        self.candidates.as_ref()
    }

    pub fn optimizer(&self) -> Option<&OptimizerResult> {
        self.optimizer.as_ref()
    }

    /// Reconcile the current snapshots.
    pub fn view(&self) -> Result<AnnotatedView, ReconcileError> {
        reconcile(self.candidates.as_ref(), self.optimizer.as_ref())
    }

    /// Reconcile, falling back to the candidate-only view on a key fault.
    ///
    /// The fault is returned next to the view so it can still be shown.
    pub fn view_or_unannotated(
        &self,
    ) -> Result<(AnnotatedView, Option<ReconcileError>), ReconcileError> {
        match self.view() {
            Ok(view) => Ok((view, None)),
            Err(ReconcileError::InvalidInput) => Err(ReconcileError::InvalidInput),
            Err(fault) => {
                let candidates = self.candidates.as_ref().ok_or(ReconcileError::InvalidInput)?;
                Ok((AnnotatedView::unannotated(candidates), Some(fault)))
            }
        }
    }
}
