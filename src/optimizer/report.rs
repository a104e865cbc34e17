//! Derived figures for displaying an optimizer result

use super::OptimizerSummary;
use crate::candidate::Fields;
use chrono::{Days, NaiveDate};
use serde_json::Value;

/// Summary key some service versions use for the planned delivery date.
pub const DELIVERY_DATE_KEY: &str = "fecha_de_entrega";

/// Nested input objects flattened with a `prefix.` on each key.
const NESTED_INPUTS: [&str; 2] = ["weights", "dataRecalculo"];

/// Flatten the optimizer's request echo into `(variable, value)` rows.
pub fn flatten_inputs(inputs: &Fields) -> Vec<(String, Value)> {
    let mut rows = Vec::with_capacity(inputs.len());
    for (key, value) in inputs {
        match value {
            Value::Object(nested) if NESTED_INPUTS.contains(&key.as_str()) => {
                for (nested_key, nested_value) in nested {
                    rows.push((format!("{}.{}", key, nested_key), nested_value.clone()));
                }
            }
            _ => rows.push((key.clone(), value.clone())),
        }
    }
    rows
}

/// Where a computed delivery date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryDate {
    /// The service sent the date itself.
    Reported(NaiveDate),
    /// Purchase date plus the longest route lead time.
    Estimated(NaiveDate),
}

impl DeliveryDate {
    pub fn date(&self) -> NaiveDate {
        match self {
            DeliveryDate::Reported(d) | DeliveryDate::Estimated(d) => *d,
        }
    }
}

/// New delivery date for an optimizer run.
///
/// A reported `fecha_de_entrega` wins; if it is present but unparseable there
/// is no date. Otherwise `purchase_date + tiempo_maximo_dias`.
pub fn delivery_date(summary: &OptimizerSummary, purchase_date: NaiveDate) -> Option<DeliveryDate> {
    if let Some(reported) = summary.extra(DELIVERY_DATE_KEY) {
        let text = match reported {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => Some(DeliveryDate::Reported(date)),
            Err(e) => {
                tracing::warn!(value = %text, error = %e, "Unparseable delivery date in summary");
                None
            }
        };
    }

    let days = u64::try_from(summary.max_lead_time_days?).ok()?;
    purchase_date
        .checked_add_days(Days::new(days))
        .map(DeliveryDate::Estimated)
}
