//! Display-ready merge of candidates and optimizer selection

use super::ReconcileWarning;
use crate::candidate::{CandidateRow, CandidateSet, Fields};
use crate::optimizer::{OptimizerRoute, OptimizerSummary};
use serde::Serialize;

/// A candidate row annotated with the optimizer's choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    pub route_key: String,
    /// The candidate's columns, untouched.
    pub fields: Fields,
    pub selected: bool,
    /// Present iff `selected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_fields: Option<OptimizerRoute>,
}

impl AnnotatedRow {
    pub(crate) fn unselected(row: &CandidateRow) -> Self {
        Self {
            route_key: row.route_key.clone(),
            fields: row.fields.clone(),
            selected: false,
            optimizer_fields: None,
        }
    }

    pub(crate) fn selected(row: &CandidateRow, route: &OptimizerRoute) -> Self {
        Self {
            route_key: row.route_key.clone(),
            fields: row.fields.clone(),
            selected: true,
            optimizer_fields: Some(route.clone()),
        }
    }
}

/// Every candidate row in warehouse order, plus the optimizer summary.
///
/// Always derived from two snapshots and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedView {
    pub rows: Vec<AnnotatedRow>,
    pub summary: Option<OptimizerSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ReconcileWarning>,
}

impl AnnotatedView {
    /// A candidate-only view with nothing selected.
    ///
    /// Performs no key checks, so it can stand in when reconciliation
    /// failed on duplicate keys.
    pub fn unannotated(candidates: &CandidateSet) -> Self {
        Self {
            rows: candidates.iter().map(AnnotatedRow::unselected).collect(),
            summary: None,
            warnings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected_rows(&self) -> impl Iterator<Item = &AnnotatedRow> {
        self.rows.iter().filter(|r| r.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_rows().count()
    }

    pub fn row(&self, route_key: &str) -> Option<&AnnotatedRow> {
        self.rows.iter().find(|r| r.route_key == route_key)
    }

    /// Optimizer route keys with no candidate row.
    pub fn unmatched_route_keys(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                ReconcileWarning::UnmatchedOptimizerRoute { route_key } => Some(route_key.as_str()),
                ReconcileWarning::MissingSummary => None,
            })
            .collect()
    }
}
