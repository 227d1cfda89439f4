// Response wrapper shared by every transport
// Author: kelexine (https://github.com/kelexine)

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::{ApiError, Result};

enum ResponseBody {
    Http(reqwest::Response),
    Stream(BoxStream<'static, Result<Bytes>>),
    Full(Bytes),
}

/// Status, headers and a body that can be read once.
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl ApiResponse {
    /// A response with a fully buffered body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Full(body.into()),
        }
    }

    /// A response whose body arrives in chunks; a chunk error fails the read.
    pub fn from_stream(status: StatusCode, stream: BoxStream<'static, Result<Bytes>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Stream(stream),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub async fn bytes(self) -> Result<Bytes> {
        match self.body {
            ResponseBody::Full(bytes) => Ok(bytes),
            ResponseBody::Http(response) => response
                .bytes()
                .await
                .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e))),
            ResponseBody::Stream(mut stream) => {
                let mut buffer = Vec::new();
                while let Some(chunk) = stream.next().await {
                    buffer.extend_from_slice(&chunk?);
                }
                Ok(Bytes::from(buffer))
            }
        }
    }

    pub async fn text(self) -> Result<String> {
        match self.body {
            ResponseBody::Http(response) => response
                .text()
                .await
                .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e))),
            body => {
                let bytes = Self {
                    status: self.status,
                    headers: HeaderMap::new(),
                    body,
                }
                .bytes()
                .await?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl From<reqwest::Response> for ApiResponse {
    fn from(response: reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            body: ResponseBody::Http(response),
        }
    }
}

impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_buffered_body() {
        let response = ApiResponse::new(StatusCode::OK, "hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_streamed_body_concatenates_chunks() {
        let chunks = vec![Ok(Bytes::from_static(b"{\"a\":")), Ok(Bytes::from_static(b"1}"))];
        let response = ApiResponse::from_stream(StatusCode::OK, stream::iter(chunks).boxed());
        let value: serde_json::Value = response.json().await.unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_streamed_body_error_fails_read() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(ApiError::Transport("connection reset".to_string())),
        ];
        let response = ApiResponse::from_stream(StatusCode::OK, stream::iter(chunks).boxed());
        assert!(response.text().await.is_err());
    }
}
