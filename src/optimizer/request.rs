//! Optimizer request body

use super::{OptimizerError, Weights};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs for re-planning an order after a store rejected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationData {
    pub fecha_compra_original: NaiveDate,
    pub fecha_entrega_original: NaiveDate,
    pub tienda_rechazo: i64,
}

impl RecalculationData {
    /// Build recalculation data; the original delivery can't precede the purchase.
    pub fn new(
        purchase_date: NaiveDate,
        original_delivery: NaiveDate,
        rejected_store: i64,
    ) -> Result<Self, OptimizerError> {
        if original_delivery < purchase_date {
            return Err(OptimizerError::InvalidRequest(format!(
                "original delivery date {} is before purchase date {}",
                original_delivery, purchase_date
            )));
        }
        if rejected_store < 0 {
            return Err(OptimizerError::InvalidRequest(format!(
                "rejected store must be non-negative, got {}",
                rejected_store
            )));
        }
        Ok(Self {
            fecha_compra_original: purchase_date,
            fecha_entrega_original: original_delivery,
            tienda_rechazo: rejected_store,
        })
    }
}

/// Body of the optimizer POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerRequest {
    pub sku: String,
    pub cp: String,
    pub qty: u32,
    pub flag_vn: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
    #[serde(default)]
    pub recalculo: bool,
    #[serde(
        default,
        rename = "dataRecalculo",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_recalculo: Option<RecalculationData>,
}

fn is_code(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

impl OptimizerRequest {
    /// Build a request; `sku` and `cp` must be numeric codes and `qty` at least one.
    pub fn new(
        sku: impl Into<String>,
        cp: impl Into<String>,
        qty: u32,
        flag_vn: bool,
    ) -> Result<Self, OptimizerError> {
        let sku = sku.into().trim().to_string();
        let cp = cp.into().trim().to_string();

        if !is_code(&sku) {
            return Err(OptimizerError::InvalidRequest(format!(
                "sku must be a numeric code, got '{}'",
                sku
            )));
        }
        if !is_code(&cp) {
            return Err(OptimizerError::InvalidRequest(format!(
                "cp must be a numeric code, got '{}'",
                cp
            )));
        }
        if qty == 0 {
            return Err(OptimizerError::InvalidRequest(
                "qty must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            sku,
            cp,
            qty,
            flag_vn,
            weights: None,
            recalculo: false,
            data_recalculo: None,
        })
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_recalculation(mut self, data: RecalculationData) -> Self {
        self.recalculo = true;
        self.data_recalculo = Some(data);
        self
    }

    /// Store rejected in a recalculation run, if any.
    pub fn rejected_store(&self) -> Option<i64> {
        self.data_recalculo.map(|d| d.tienda_rechazo)
    }
}
