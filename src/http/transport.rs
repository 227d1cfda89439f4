// Transport seam and the default reqwest-backed implementation
// Author: kelexine (https://github.com/kelexine)

use futures::future::BoxFuture;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::{ApiRequest, ApiResponse};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// Sends one already-decorated request.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

impl<F, Fut> Transport for F
where
    F: Fn(ApiRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
{
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(self(request))
    }
}

/// Default transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue the request exactly once. Every failure maps to `ApiError::Transport`.
    pub async fn perform_request(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(ApiResponse::from(response))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(self.perform_request(request))
    }
}
