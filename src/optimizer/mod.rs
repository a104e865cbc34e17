//! Route optimizer boundary
//!
//! The optimizer is an external service that picks the best routes for a
//! SKU/postal-code/quantity request. This module holds the request and
//! result snapshot types, the service wire format, and the HTTP client.
//!
//! # Example
//!
//! ```rust
//! use trazo::optimizer::{OptimizerRequest, WeightPreset, Weights};
//!
//! let request = OptimizerRequest::new("1139002876", "52715", 2, false)
//!     .unwrap()
//!     .with_weights(Weights::standard(WeightPreset::Baja));
//! assert!(!request.recalculo);
//! ```

pub mod client;
pub mod error;
pub mod report;
pub mod request;
pub mod types;
pub mod weights;
pub mod wire;

pub use client::HttpOptimizer;
pub use error::OptimizerError;
pub use report::{delivery_date, flatten_inputs, DeliveryDate};
pub use request::{OptimizerRequest, RecalculationData};
pub use types::{ModelStatus, OptimizerResult, OptimizerRoute, OptimizerSummary};
pub use weights::{parse_weight_override, PresetMatch, WeightPreset, Weights};
pub use wire::{load_optimizer_file, OptimizerResponse};

use async_trait::async_trait;

/// Anything that can turn an optimizer request into an [`OptimizerResult`].
#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    /// Identifier for logging.
    fn name(&self) -> &str;

    /// Run one optimization. No retries.
    async fn optimize(&self, request: &OptimizerRequest)
        -> Result<OptimizerResult, OptimizerError>;
}
