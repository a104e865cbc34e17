//! On-hand inventory totals over a candidate set

use super::CandidateSet;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Warehouse column with on-hand units at the fulfilling store.
pub const INVENTORY_COLUMN: &str = "INVENTARIO_OH";

/// Warehouse column with the store identifier.
pub const STORE_COLUMN: &str = "TDA_CVE";

/// Inventory shown above the candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryTotal {
    /// Summed once per store; `excluded_store` was left out of the sum.
    PerStore {
        total: i64,
        excluded_store: Option<i64>,
    },
    /// No store column, so every row was summed.
    Raw { total: i64 },
}

impl InventoryTotal {
    pub fn total(&self) -> i64 {
        match self {
            InventoryTotal::PerStore { total, .. } | InventoryTotal::Raw { total } => *total,
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_store(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Total on-hand inventory for a candidate set.
///
/// Rows are de-duplicated by store (first row per store wins) because every
/// route out of the same store reports the same stock. `exclude_store` drops
/// a rejected store from the sum. Returns `None` when no row carries the
/// inventory column.
pub fn inventory_total(set: &CandidateSet, exclude_store: Option<i64>) -> Option<InventoryTotal> {
    let has_inventory = set.iter().any(|r| r.fields.contains_key(INVENTORY_COLUMN));
    if !has_inventory {
        return None;
    }

    let has_store = set.iter().any(|r| r.fields.contains_key(STORE_COLUMN));
    if !has_store {
        let total: f64 = set
            .iter()
            .filter_map(|r| r.fields.get(INVENTORY_COLUMN).and_then(as_number))
            .sum();
        return Some(InventoryTotal::Raw {
            total: total as i64,
        });
    }

    let mut seen = HashSet::new();
    let mut total = 0.0;
    for row in set {
        let store = row.fields.get(STORE_COLUMN).cloned().unwrap_or(Value::Null);
        if !seen.insert(store.to_string()) {
            continue;
        }
        if exclude_store.is_some() && as_store(&store) == exclude_store {
            continue;
        }
        total += row
            .fields
            .get(INVENTORY_COLUMN)
            .and_then(as_number)
            .unwrap_or(0.0);
    }

    Some(InventoryTotal::PerStore {
        total: total as i64,
        excluded_store: exclude_store,
    })
}
