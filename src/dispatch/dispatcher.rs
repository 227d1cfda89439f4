// Backoff-controlled request dispatcher
// Author: kelexine (https://github.com/kelexine)

use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{BackoffPolicy, CooldownSlot, RetryDecision};
use crate::config::{ApiConfig, AppConfig};
use crate::error::{ApiError, Result, THROTTLED_FALLBACK_MESSAGE};
use crate::http::{ApiRequest, ApiResponse, GitHubDecorator, RequestDecorator, ReqwestTransport, Transport};
use crate::metrics;
use crate::utils::logging::sanitize;

/// Handle shared by every request of one client session.
///
/// Clones share the same cooldown, so a failure seen by one caller delays
/// all of them.
#[derive(Clone)]
pub struct Api {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    decorator: Arc<dyn RequestDecorator>,
    transport: Option<Arc<dyn Transport>>,
    default_transport: ReqwestTransport,
    cooldown: CooldownSlot,
    policy: BackoffPolicy,
}

/// Builder for [`Api`].
pub struct ApiBuilder {
    config: ApiConfig,
    decorator: Option<Arc<dyn RequestDecorator>>,
    transport: Option<Arc<dyn Transport>>,
    policy: BackoffPolicy,
}

impl ApiBuilder {
    /// Replace the default [`GitHubDecorator`].
    pub fn decorator(mut self, decorator: impl RequestDecorator + 'static) -> Self {
        self.decorator = Some(Arc::new(decorator));
        self
    }

    /// Send requests through `transport` instead of the default reqwest client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<Api> {
        let default_transport = ReqwestTransport::new(&self.config)?;
        let decorator = self
            .decorator
            .unwrap_or_else(|| Arc::new(GitHubDecorator::from_config(&self.config)));

        Ok(Api {
            inner: Arc::new(ApiInner {
                decorator,
                transport: self.transport,
                default_transport,
                cooldown: CooldownSlot::new(),
                policy: self.policy,
            }),
        })
    }
}

impl Api {
    pub fn builder(config: &ApiConfig) -> ApiBuilder {
        ApiBuilder {
            config: config.clone(),
            decorator: None,
            transport: None,
            policy: BackoffPolicy::default(),
        }
    }

    /// Handle with the GitHub decorator, default transport and configured policy.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::builder(&config.api)
            .policy(BackoffPolicy::from(&config.backoff))
            .build()
    }

    pub fn cooldown(&self) -> &CooldownSlot {
        &self.inner.cooldown
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.inner.policy
    }

    fn transport(&self) -> &dyn Transport {
        match &self.inner.transport {
            Some(transport) => transport.as_ref(),
            None => &self.inner.default_transport,
        }
    }

    /// Shorthand for [`request_with_backoff`].
    pub async fn request(&self, request: impl Into<ApiRequest>) -> Result<ApiResponse> {
        request_with_backoff(self, request).await
    }

    /// Request and deserialize a JSON body, failing on non-success statuses.
    pub async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        request: impl Into<ApiRequest>,
    ) -> Result<T> {
        let response = self.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Fetch(format!("HTTP {}: {}", status.as_u16(), body)));
        }
        response.json().await
    }
}

/// Send `request`, retrying failures behind a cooldown shared by the handle.
pub async fn request_with_backoff(api: &Api, request: impl Into<ApiRequest>) -> Result<ApiResponse> {
    request_with_backoff_from(api, request, 1).await
}

/// Same as [`request_with_backoff`], counting attempts from `attempt`.
///
/// A failure on attempt `n <= max_attempts` installs an `n²` cooldown when
/// none is active and tries again with the undecorated request. A failure on
/// a later attempt is returned unchanged.
pub async fn request_with_backoff_from(
    api: &Api,
    request: impl Into<ApiRequest>,
    mut attempt: u32,
) -> Result<ApiResponse> {
    let request = request.into();

    loop {
        if let Some(waited) = api.cooldown().wait().await {
            metrics::record_cooldown_wait(waited.as_secs_f64());
            debug!("Waited {}ms for cooldown before attempt {}", waited.as_millis(), attempt);
        }

        let failure = match send_once(api, request.clone()).await {
            Ok(response) => {
                metrics::record_attempt("success");
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", request.url, attempt);
                }
                return Ok(response);
            }
            Err(failure) => failure,
        };
        metrics::record_attempt(failure.kind());

        match api.policy().decide(&failure, attempt) {
            RetryDecision::GiveUp => {
                warn!(
                    "{} failed after {} attempts: {}",
                    request.url,
                    attempt,
                    sanitize(&failure.to_string())
                );
                metrics::record_exhausted(failure.kind());
                return Err(failure);
            }
            RetryDecision::Retry { cooldown } => {
                if api.cooldown().install(cooldown) {
                    metrics::record_cooldown(attempt);
                    info!(
                        "{} failed on attempt {} ({}), pausing requests for {}ms",
                        request.url,
                        attempt,
                        failure.kind(),
                        cooldown.as_millis()
                    );
                }
                attempt += 1;
            }
        }
    }
}

/// One decorated attempt. HTTP 429 becomes `ApiError::Throttled`.
async fn send_once(api: &Api, request: ApiRequest) -> Result<ApiResponse> {
    let request = api.inner.decorator.decorate(request);
    let response = api.transport().send(request).await?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| THROTTLED_FALLBACK_MESSAGE.to_string());
        return Err(ApiError::Throttled { message });
    }

    Ok(response)
}
