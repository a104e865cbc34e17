//! Warehouse route candidates
//!
//! A [`CandidateSet`] is the immutable snapshot of the rows a warehouse query
//! returned for one SKU/postal-code pair. Every column is kept as-is in an
//! ordered field map; only the route key column is interpreted.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trazo::candidate::CandidateSet;
//!
//! let records = vec![
//!     json!({"ID_TRAZO": "R7011611", "TDA_CVE": 417}),
//!     json!({"ID_TRAZO": "R9999999", "TDA_CVE": 108}),
//! ];
//! let set = CandidateSet::from_values(records, "ID_TRAZO").unwrap();
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.route_keys(), vec!["R7011611", "R9999999"]);
//! ```

pub mod error;
pub mod inventory;

pub use error::CandidateError;
pub use inventory::{inventory_total, InventoryTotal, INVENTORY_COLUMN, STORE_COLUMN};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Column name to value, in warehouse column order.
pub type Fields = serde_json::Map<String, Value>;

/// Default warehouse column holding the route (trace) identifier.
pub const DEFAULT_ROUTE_KEY_COLUMN: &str = "ID_TRAZO";

/// Render a scalar JSON value as route key text.
///
/// Strings are taken verbatim and numbers use their JSON text, so `7011611`
/// and `"7011611"` produce the same key. Anything else has no key text.
pub fn route_key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One warehouse-returned route option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub route_key: String,
    pub fields: Fields,
}

impl CandidateRow {
    /// Build a row from its columns, deriving the key from `key_column`.
    ///
    /// `row` is only used to locate the record in error messages.
    pub fn from_fields(
        row: usize,
        fields: Fields,
        key_column: &str,
    ) -> Result<Self, CandidateError> {
        let route_key = match fields.get(key_column) {
            None | Some(Value::Null) => {
                return Err(CandidateError::MissingRouteKey {
                    row,
                    column: key_column.to_string(),
                })
            }
            Some(value) => route_key_text(value).ok_or_else(|| CandidateError::InvalidRouteKey {
                row,
                column: key_column.to_string(),
                value: value.to_string(),
            })?,
        };

        Ok(Self { route_key, fields })
    }
}

/// Ordered, immutable set of candidate rows from one warehouse query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    rows: Vec<CandidateRow>,
}

impl CandidateSet {
    pub fn new(rows: Vec<CandidateRow>) -> Self {
        Self { rows }
    }

    /// Build a set from warehouse records, keeping their order.
    pub fn from_records(records: Vec<Fields>, key_column: &str) -> Result<Self, CandidateError> {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, fields)| CandidateRow::from_fields(i, fields, key_column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// Build a set from arbitrary JSON values; every value must be an object.
    pub fn from_values(values: Vec<Value>, key_column: &str) -> Result<Self, CandidateError> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::Object(fields) => CandidateRow::from_fields(i, fields, key_column),
                other => Err(CandidateError::NotARecord {
                    row: i,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// Load a saved snapshot: a JSON array of warehouse records.
    pub fn load(path: &Path, key_column: &str) -> Result<Self, CandidateError> {
        let content = std::fs::read_to_string(path).map_err(|source| CandidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<Fields> =
            serde_json::from_str(&content).map_err(|e| CandidateError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_records(records, key_column)
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateRow> {
        self.rows.iter()
    }

    /// Route keys in row order.
    pub fn route_keys(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.route_key.as_str()).collect()
    }

    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in &self.rows {
            for name in row.fields.keys() {
                if !columns.contains(&name.as_str()) {
                    columns.push(name);
                }
            }
        }
        columns
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a CandidateRow;
    type IntoIter = std::slice::Iter<'a, CandidateRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
