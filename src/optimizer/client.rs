//! HTTP client for the route optimizer service.

use super::{OptimizerError, OptimizerRequest, OptimizerResponse, OptimizerResult, RouteOptimizer};
use crate::config::OptimizerConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Optimizer reached over HTTP.
///
/// Each call is a single POST; a failure is returned to the caller as-is.
pub struct HttpOptimizer {
    url: String,
    timeout: Duration,
    client: Client,
}

impl HttpOptimizer {
    pub fn new(url: impl Into<String>, timeout: Duration, client: Client) -> Self {
        Self {
            url: url.into(),
            timeout,
            client,
        }
    }

    pub fn from_config(config: &OptimizerConfig, client: Client) -> Self {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
            client,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RouteOptimizer for HttpOptimizer {
    fn name(&self) -> &str {
        "http"
    }

    async fn optimize(
        &self,
        request: &OptimizerRequest,
    ) -> Result<OptimizerResult, OptimizerError> {
        tracing::debug!(
            url = %self.url,
            sku = %request.sku,
            cp = %request.cp,
            qty = request.qty,
            recalculo = request.recalculo,
            "Calling optimizer"
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OptimizerError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    OptimizerError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            OptimizerError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(OptimizerError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let result = OptimizerResponse::from_json(&body)?.into_result()?;

        tracing::info!(
            routes = result.routes.len(),
            status = result.status_label(),
            "Optimizer returned"
        );

        Ok(result)
    }
}
