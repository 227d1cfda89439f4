// Request decoration: URL resolution, auth and default headers
// Author: kelexine (https://github.com/kelexine)

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use tracing::warn;

use super::ApiRequest;
use crate::config::ApiConfig;

pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Turns a caller's descriptor into the one handed to the transport.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, request: ApiRequest) -> ApiRequest;
}

impl<F> RequestDecorator for F
where
    F: Fn(ApiRequest) -> ApiRequest + Send + Sync,
{
    fn decorate(&self, request: ApiRequest) -> ApiRequest {
        self(request)
    }
}

/// Decorator for the GitHub REST API.
///
/// Headers already present on the request are left untouched.
#[derive(Clone)]
pub struct GitHubDecorator {
    api_root: String,
    token: Option<String>,
}

impl GitHubDecorator {
    pub fn new(api_root: impl Into<String>, token: Option<String>) -> Self {
        Self {
            api_root: api_root.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.api_root.clone(), config.token.clone())
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }
}

impl std::fmt::Debug for GitHubDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubDecorator")
            .field("api_root", &self.api_root)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RequestDecorator for GitHubDecorator {
    fn decorate(&self, mut request: ApiRequest) -> ApiRequest {
        if request.is_relative() {
            request.url = format!("{}{}", self.api_root, request.url);
        }

        if !request.headers.contains_key(ACCEPT) {
            request
                .headers
                .insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        }

        if request.body.is_some() && !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        if let Some(token) = &self.token {
            if !request.headers.contains_key(AUTHORIZATION) {
                match HeaderValue::from_str(&format!("token {}", token)) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        request.headers.insert(AUTHORIZATION, value);
                    }
                    Err(_) => warn!("Configured token is not a valid header value, sending unauthenticated"),
                }
            }
        }

        if let Some(value) = request.cache.header_value() {
            request
                .headers
                .entry(CACHE_CONTROL)
                .or_insert(HeaderValue::from_static(value));
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::CacheHint;

    #[test]
    fn test_relative_url_resolved_against_root() {
        let decorator = GitHubDecorator::new("https://api.github.com/", None);
        let request = decorator.decorate(ApiRequest::from("/repos/o/r/contents/a.md"));
        assert_eq!(request.url, "https://api.github.com/repos/o/r/contents/a.md");
        assert_eq!(request.headers.get(ACCEPT).unwrap(), GITHUB_ACCEPT);
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_absolute_url_kept() {
        let decorator = GitHubDecorator::new("https://api.github.com", None);
        let request = decorator.decorate(ApiRequest::from("https://uploads.github.com/x"));
        assert_eq!(request.url, "https://uploads.github.com/x");
    }

    #[test]
    fn test_token_and_cache_headers() {
        let decorator = GitHubDecorator::new("https://api.github.com", Some("ghp_secret".to_string()));
        let request = decorator.decorate(
            ApiRequest::from("/user")
                .body("{}")
                .cache(CacheHint::NoStore),
        );
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "token ghp_secret");
        assert_eq!(request.headers.get(CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), JSON_CONTENT_TYPE);
        assert!(!format!("{:?}", decorator).contains("ghp_secret"));
    }

    #[test]
    fn test_closure_decorator() {
        let decorator = |request: ApiRequest| request.param("ref", "main");
        let request = decorator.decorate(ApiRequest::from("/x"));
        assert_eq!(request.params, vec![("ref".to_string(), "main".to_string())]);
    }
}
