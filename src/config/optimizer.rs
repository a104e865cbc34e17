//! Optimizer service configuration

use crate::optimizer::WeightPreset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Endpoint receiving the optimization POST.
    pub url: String,
    pub timeout_secs: u64,
    /// Weight preset used when the command line names none.
    pub default_preset: WeightPreset,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            url: "https://cloudrun-service-fee-316812040520.us-east4.run.app/fecha-estimada-entrega"
                .to_string(),
            timeout_secs: 60,
            default_preset: WeightPreset::Baja,
        }
    }
}
