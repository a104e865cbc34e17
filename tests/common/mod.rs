//! Shared fixtures for Trazo integration tests.
//!
//! Builds warehouse rows, BigQuery response pages and optimizer bodies so
//! each test file only states what differs.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const SKU: &str = "1139002876";
pub const CP: &str = "52715";
pub const PROJECT: &str = "test-project";

// =============================================================================
// Candidate Rows
// =============================================================================

/// One warehouse row as the BigQuery export writes it.
pub fn candidate_row(route_key: &str, store: i64, inventory: i64) -> Value {
    json!({
        "ID_TRAZO": route_key,
        "SKU_CVE": 1139002876_i64,
        "CP": 52715,
        "TDA_CVE": store,
        "MET_ENTREGA": "MENSAJERIA EXTERNA",
        "INVENTARIO_OH": inventory,
    })
}

/// Three routes out of two stores.
pub fn candidate_rows() -> Vec<Value> {
    vec![
        candidate_row("R1", 108, 4),
        candidate_row("R2", 215, 7),
        candidate_row("R3", 108, 4),
    ]
}

// =============================================================================
// BigQuery Pages
// =============================================================================

/// Schema matching [`bigquery_row`].
pub fn bigquery_schema() -> Value {
    json!({
        "fields": [
            {"name": "ID_TRAZO", "type": "STRING"},
            {"name": "TDA_CVE", "type": "INTEGER"},
            {"name": "INVENTARIO_OH", "type": "FLOAT"},
            {"name": "MET_ENTREGA", "type": "STRING"}
        ]
    })
}

/// A BigQuery row: every cell is sent as a string.
pub fn bigquery_row(route_key: &str, store: i64, inventory: f64) -> Value {
    json!({
        "f": [
            {"v": route_key},
            {"v": store.to_string()},
            {"v": inventory.to_string()},
            {"v": "MENSAJERIA EXTERNA"}
        ]
    })
}

/// A completed `jobs.query` response page.
pub fn bigquery_page(rows: Vec<Value>, page_token: Option<&str>) -> Value {
    let mut page = json!({
        "kind": "bigquery#queryResponse",
        "jobComplete": true,
        "jobReference": {"projectId": PROJECT, "jobId": "job_123", "location": "US"},
        "schema": bigquery_schema(),
        "totalRows": rows.len().to_string(),
        "rows": rows,
    });
    if let Some(token) = page_token {
        page["pageToken"] = json!(token);
    }
    page
}

// =============================================================================
// Optimizer Bodies
// =============================================================================

/// One entry of the optimizer's `rutas`.
pub fn ruta(route_key: &str, qty: i64, tiempo: i64, costo: f64, tienda: i64) -> Value {
    json!({
        "id_trazo": route_key,
        "qty": qty,
        "EDD1": "2025-06-05",
        "tiempo": tiempo,
        "costo": costo,
        "tienda": tienda,
    })
}

/// An optimal optimizer body selecting `rutas`.
pub fn optimizer_body(rutas: Vec<Value>) -> Value {
    let used = rutas.len();
    let max_days = rutas
        .iter()
        .filter_map(|r| r["tiempo"].as_i64())
        .max()
        .unwrap_or(0);
    json!({
        "inputs": {
            "sku": SKU,
            "cp": CP,
            "qty": 2,
            "flag_vn": false,
            "weights": {"inventario": 0.5, "tiempo": 1.0, "costo": 2.0, "nodo": 0.5, "ruta": 0.5, "diferencia": 0.0}
        },
        "rutas": rutas,
        "resumen": {
            "tiempo_procesamiento": 0.42,
            "suma_costo_unitario": 85.5,
            "tiempo_maximo_dias": max_days,
            "cantidad_rutas_utilizadas": used,
            "estado_modelo": "Optimal"
        }
    })
}

/// An infeasible body: no routes, status only.
pub fn infeasible_body() -> Value {
    json!({
        "rutas": [],
        "resumen": {"cantidad_rutas_utilizadas": 0, "estado_modelo": "Infeasible"}
    })
}

// =============================================================================
// Files
// =============================================================================

/// Write `value` as JSON into `dir/name`.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Write a config file pointing both services at `base` URLs.
pub fn write_config(dir: &Path, warehouse_url: &str, optimizer_url: &str) -> PathBuf {
    let path = dir.join("trazo.toml");
    std::fs::write(
        &path,
        format!(
            "[warehouse]\nbase_url = \"{}\"\nproject_id = \"{}\"\ntimeout_secs = 5\n\n\
             [optimizer]\nurl = \"{}\"\ntimeout_secs = 5\n",
            warehouse_url, PROJECT, optimizer_url
        ),
    )
    .unwrap();
    path
}
