//! Optimizer service response format
//!
//! The service answers with Spanish field names (`rutas`, `resumen`,
//! `id_trazo`, ...). These types mirror that body and convert it into the
//! [`OptimizerResult`] snapshot the reconciler works with.

use super::{ModelStatus, OptimizerError, OptimizerResult, OptimizerRoute, OptimizerSummary};
use crate::candidate::{route_key_text, Fields};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

const SUMMARY_PROCESSING_TIME: &str = "tiempo_procesamiento";
const SUMMARY_UNIT_COST: &str = "suma_costo_unitario";
const SUMMARY_MAX_DAYS: &str = "tiempo_maximo_dias";
const SUMMARY_ROUTES_USED: &str = "cantidad_rutas_utilizadas";
const SUMMARY_STATUS: &str = "estado_modelo";

/// Raw optimizer response body.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerResponse {
    #[serde(default)]
    pub inputs: Fields,
    #[serde(default)]
    pub rutas: Vec<RutaWire>,
    #[serde(default)]
    pub resumen: Option<Fields>,
    #[serde(default)]
    pub error: Option<Value>,
    /// Some service versions spell the error key with a trailing colon.
    #[serde(default, rename = "error:")]
    pub error_colon: Option<Value>,
}

/// One entry of `rutas`.
#[derive(Debug, Clone, Deserialize)]
pub struct RutaWire {
    pub id_trazo: Value,
    #[serde(deserialize_with = "whole_number")]
    pub qty: i64,
    #[serde(default, rename = "EDD1")]
    pub edd1: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub tiempo: i64,
    pub costo: f64,
    #[serde(deserialize_with = "whole_number")]
    pub tienda: i64,
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Integer field that some solvers emit as `20.0`.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_int(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {}", value)))
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RutaWire {
    fn into_route(self, index: usize) -> Result<OptimizerRoute, OptimizerError> {
        let route_key = route_key_text(&self.id_trazo).ok_or_else(|| {
            OptimizerError::InvalidResponse(format!(
                "rutas[{}].id_trazo is not a string or number: {}",
                index, self.id_trazo
            ))
        })?;

        Ok(OptimizerRoute {
            route_key,
            assigned_qty: self.qty,
            estimated_delivery_date: self.edd1,
            lead_time_days: self.tiempo,
            cost: self.costo,
            store_id: self.tienda,
        })
    }
}

/// Remove `key` only when its value parses; otherwise it stays an extra.
fn take<T>(resumen: &mut Fields, key: &str, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let parsed = resumen.get(key).and_then(parse)?;
    resumen.shift_remove(key);
    Some(parsed)
}

/// Split a `resumen` object into known figures and pass-through extras.
///
/// Nothing the service sent is dropped: a figure that does not parse is kept
/// in `extra` as sent, and the status label is kept verbatim.
pub fn summary_from_resumen(mut resumen: Fields) -> OptimizerSummary {
    let total_processing_time = take(&mut resumen, SUMMARY_PROCESSING_TIME, Value::as_f64);
    let total_unit_cost = take(&mut resumen, SUMMARY_UNIT_COST, Value::as_f64);
    let max_lead_time_days = take(&mut resumen, SUMMARY_MAX_DAYS, as_int);
    let routes_used_count = take(&mut resumen, SUMMARY_ROUTES_USED, as_int);
    let status_label = match resumen.shift_remove(SUMMARY_STATUS) {
        Some(Value::String(label)) => label,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    OptimizerSummary {
        total_processing_time,
        total_unit_cost,
        max_lead_time_days,
        routes_used_count,
        model_status: ModelStatus::from(status_label.as_str()),
        status_label,
        extra: resumen,
    }
}

impl OptimizerResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, OptimizerError> {
        serde_json::from_str(body).map_err(|e| {
            OptimizerError::InvalidResponse(format!("Failed to parse optimizer response: {}", e))
        })
    }

    /// Convert into a snapshot, surfacing a service-reported error.
    pub fn into_result(self) -> Result<OptimizerResult, OptimizerError> {
        if let Some(err) = self.error.as_ref().or(self.error_colon.as_ref()) {
            return Err(OptimizerError::Service(error_text(err)));
        }

        let summary = match self.resumen {
            Some(resumen) => Some(summary_from_resumen(resumen)),
            None => {
                tracing::warn!(routes = self.rutas.len(), "Optimizer response has no 'resumen'");
                None
            }
        };

        let routes = self
            .rutas
            .into_iter()
            .enumerate()
            .map(|(i, ruta)| ruta.into_route(i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OptimizerResult {
            routes,
            summary,
            inputs: self.inputs,
        })
    }
}

/// Load a saved optimizer response body from disk.
pub fn load_optimizer_file(path: &Path) -> Result<OptimizerResult, OptimizerError> {
    let body = std::fs::read_to_string(path).map_err(|e| {
        OptimizerError::InvalidResponse(format!("Failed to read {}: {}", path.display(), e))
    })?;
    OptimizerResponse::from_json(&body)?.into_result()
}
