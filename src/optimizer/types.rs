//! Optimizer result snapshot

use crate::candidate::Fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Solver outcome reported by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelStatus {
    Optimal,
    Infeasible,
    /// Any other label, kept verbatim.
    Other(String),
}

impl ModelStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, ModelStatus::Optimal)
    }
}

impl From<String> for ModelStatus {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "optimal" => ModelStatus::Optimal,
            "infeasible" => ModelStatus::Infeasible,
            _ => ModelStatus::Other(label),
        }
    }
}

impl From<&str> for ModelStatus {
    fn from(label: &str) -> Self {
        ModelStatus::from(label.to_string())
    }
}

impl From<ModelStatus> for String {
    fn from(status: ModelStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Optimal => write!(f, "Optimal"),
            ModelStatus::Infeasible => write!(f, "Infeasible"),
            ModelStatus::Other(label) => write!(f, "{}", label),
        }
    }
}

/// One route the optimizer selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerRoute {
    pub route_key: String,
    pub assigned_qty: i64,
    /// Estimated delivery date exactly as the service sent it.
    pub estimated_delivery_date: Option<String>,
    pub lead_time_days: i64,
    pub cost: f64,
    pub store_id: i64,
}

/// Aggregate figures for one optimizer run. Forwarded for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSummary {
    pub total_processing_time: Option<f64>,
    pub total_unit_cost: Option<f64>,
    pub max_lead_time_days: Option<i64>,
    pub routes_used_count: Option<i64>,
    pub model_status: ModelStatus,
    /// `estado_modelo` exactly as the service sent it.
    #[serde(default)]
    pub status_label: String,
    /// Keys the service sent beyond the known ones, in service order.
    /// Known figures that did not parse stay here under their own key.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: Fields,
}

impl OptimizerSummary {
    /// A summary holding only a status, as an infeasible run reports.
    pub fn with_status(model_status: ModelStatus) -> Self {
        Self {
            total_processing_time: None,
            total_unit_cost: None,
            max_lead_time_days: None,
            routes_used_count: None,
            status_label: model_status.to_string(),
            model_status,
            extra: Fields::new(),
        }
    }

    /// Look up an extra key the service sent.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Immutable snapshot of one optimizer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerResult {
    pub routes: Vec<OptimizerRoute>,
    /// `None` when the service sent no `resumen`.
    pub summary: Option<OptimizerSummary>,
    /// Request echo returned by the service, including solver weights.
    #[serde(default)]
    pub inputs: Fields,
}

impl OptimizerResult {
    pub fn new(routes: Vec<OptimizerRoute>, summary: OptimizerSummary) -> Self {
        Self {
            routes,
            summary: Some(summary),
            inputs: Fields::new(),
        }
    }

    /// Reported model status label, empty without a summary.
    pub fn status_label(&self) -> &str {
        self.summary
            .as_ref()
            .map(|s| s.status_label.as_str())
            .unwrap_or_default()
    }

    pub fn route_keys(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.route_key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_status_parse_known_labels() {
        assert_eq!(ModelStatus::from("Optimal"), ModelStatus::Optimal);
        assert_eq!(ModelStatus::from("optimal"), ModelStatus::Optimal);
        assert_eq!(ModelStatus::from("Infeasible"), ModelStatus::Infeasible);
    }

    #[test]
    fn test_model_status_keeps_unknown_label() {
        let status = ModelStatus::from("Not Solved");
        assert_eq!(status, ModelStatus::Other("Not Solved".to_string()));
        assert_eq!(status.to_string(), "Not Solved");
    }

    #[test]
    fn test_model_status_serde_as_string() {
        let json = serde_json::to_string(&ModelStatus::Optimal).unwrap();
        assert_eq!(json, "\"Optimal\"");
        let parsed: ModelStatus = serde_json::from_str("\"Infeasible\"").unwrap();
        assert_eq!(parsed, ModelStatus::Infeasible);
    }

    #[test]
    fn test_summary_with_status_is_empty() {
        let summary = OptimizerSummary::with_status(ModelStatus::Infeasible);
        assert!(summary.routes_used_count.is_none());
        assert!(summary.extra.is_empty());
        assert_eq!(summary.status_label, "Infeasible");
        assert!(!summary.model_status.is_optimal());
    }
}
