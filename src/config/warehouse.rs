//! Warehouse configuration

use crate::candidate::DEFAULT_ROUTE_KEY_COLUMN;
use serde::{Deserialize, Serialize};

/// Where candidate routes are queried from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// BigQuery REST root, or a proxy exposing the same API.
    pub base_url: String,
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    /// Column holding the route key shared with the optimizer.
    pub route_key_column: String,
    pub timeout_secs: u64,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bigquery.googleapis.com/bigquery/v2".to_string(),
            project_id: "liv-dev-dig-chatbot".to_string(),
            dataset_id: "Fecha_Estimada_Entrega".to_string(),
            table_id: "TB_FEE_RESULTADO_CON_TIEMPO3_UUID".to_string(),
            route_key_column: DEFAULT_ROUTE_KEY_COLUMN.to_string(),
            timeout_secs: 30,
        }
    }
}
