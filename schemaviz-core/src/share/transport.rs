//! HTTP transport for the share protocol.

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

/// Client identifier sent with every request.
pub const CLIENT_USER_AGENT: &str = "schemaviz";

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

/// Posts a JSON body to an endpoint.
///
/// Implementations only move bytes; status interpretation belongs to the
/// share client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    /// Returns [`TransportError`] if no response was received
    async fn execute(&self, endpoint: &str, body: Bytes) -> Result<TransportResponse, TransportError>;
}

/// `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Builds a client whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns [`TransportError::Http`] if the TLS backend cannot be initialized
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Wraps an existing client; `timeout` is still applied per request.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, endpoint: &str, body: Bytes) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;
        tracing::debug!(status, bytes = body.len(), "Received share API response");

        Ok(TransportResponse { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(error)
    }
}
