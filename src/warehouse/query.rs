//! Candidate route query

use super::WarehouseError;
use crate::config::WarehouseConfig;
use std::fmt;

/// Sanitised SKU/postal-code pair.
///
/// Both values are digit-only, which is what makes splicing them into the
/// SQL text safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    sku: String,
    cp: String,
}

fn check_code(name: &'static str, value: &str) -> Result<String, WarehouseError> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WarehouseError::InvalidParameter {
            name,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

impl CandidateQuery {
    pub fn new(sku: &str, cp: &str) -> Result<Self, WarehouseError> {
        Ok(Self {
            sku: check_code("sku", sku)?,
            cp: check_code("cp", cp)?,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn cp(&self) -> &str {
        &self.cp
    }

    /// Standard SQL for the configured source table.
    ///
    /// Filters out own-fleet routes in red zones, courier routes for
    /// excluded products, and stores with no stock on hand.
    pub fn to_sql(&self, table: &TableRef) -> String {
        format!(
            "SELECT * FROM {table}\n\
             WHERE 1=1\n\
             AND SKU_CVE = {sku}\n\
             AND CP = {cp}\n\
             AND NOT (MET_ENTREGA = 'FLOTA LIVERPOOL' AND ZONA_ROJA = 1)\n\
             AND NOT (MET_ENTREGA = 'MENSAJERIA EXTERNA' AND EXCL_PROD != 0)\n\
             AND INVENTARIO_OH > 0",
            table = table,
            sku = self.sku,
            cp = self.cp,
        )
    }
}

/// Fully qualified `project.dataset.table` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn from_config(config: &WarehouseConfig) -> Self {
        Self {
            project_id: config.project_id.clone(),
            dataset_id: config.dataset_id.clone(),
            table_id: config.table_id.clone(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}.{}.{}`",
            self.project_id, self.dataset_id, self.table_id
        )
    }
}
