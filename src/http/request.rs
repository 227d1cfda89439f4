// Outbound request descriptor
// Author: kelexine (https://github.com/kelexine)

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::error::Result;

/// Cache behaviour requested from the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheHint {
    #[default]
    Default,
    NoCache,
    NoStore,
    Reload,
}

impl CacheHint {
    /// Value for the `Cache-Control` request header, if any.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            CacheHint::Default => None,
            CacheHint::NoCache | CacheHint::Reload => Some("no-cache"),
            CacheHint::NoStore => Some("no-store"),
        }
    }
}

/// A request against the provider's REST API.
///
/// A bare URL converts into a `GET` with no parameters, headers or body.
/// Relative URLs (starting with `/`) are resolved by the decorator.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub cache: CacheHint,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            cache: CacheHint::Default,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(self)
    }

    pub fn cache(mut self, cache: CacheHint) -> Self {
        self.cache = cache;
        self
    }

    pub fn is_relative(&self) -> bool {
        self.url.starts_with('/')
    }
}

impl From<&str> for ApiRequest {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ApiRequest {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}
