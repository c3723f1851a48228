//! Share client.
//!
//! Publishing is two dependent GraphQL calls against one endpoint:
//! 1. `VisualizeMutation` uploads the document and returns an `extID`
//! 2. `ShareVisualizationMutation` makes that `extID` public
//!
//! The link is `{scheme}://{host[:port]}/explore/{extID}`, built from the
//! configured endpoint. Only HTTP 200 is a success. HTTP 429 on either call is
//! reported as [`SchemaVizError::RateLimited`]; nothing is retried.
//!
//! # Module Structure
//! - `graphql`: Mutation texts, request bodies and response envelopes
//! - `transport`: The [`Transport`] seam and its `reqwest` implementation

pub mod graphql;
pub mod transport;


use crate::cancel;
use crate::config::ShareConfig;
use crate::error::{ShareProtocolError, ShareStage};
use crate::extract::SchemaDocument;
use crate::{Result, error::SchemaVizError};
use bytes::Bytes;
use graphql::{GraphqlRequest, ShareData, VisualizeData};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

pub use transport::{CLIENT_USER_AGENT, HttpTransport, Transport, TransportResponse};

/// Publishes `document` and returns its public link.
///
/// # Errors
/// - [`SchemaVizError::Configuration`] if the endpoint is invalid (no request is made)
/// - [`SchemaVizError::VisualizeRequest`] / [`SchemaVizError::ShareRequest`] on
///   transport, status or decoding failures
/// - [`SchemaVizError::RateLimited`] on HTTP 429
/// - [`SchemaVizError::ShareFailed`] if the service refuses to share
/// - [`SchemaVizError::Cancelled`] if `cancel` fires first
///
/// # Example
/// ```rust,no_run
/// use schemaviz_core::config::ShareConfig;
/// use schemaviz_core::extract::SchemaDocument;
/// use schemaviz_core::share::share;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> schemaviz_core::Result<()> {
/// let document = SchemaDocument::new(b"schema \"main\" {\n}\n".to_vec());
/// let link = share(&document, "SQLITE", &ShareConfig::default(), &CancellationToken::new()).await?;
/// println!("{link}");
/// # Ok(())
/// # }
/// ```
pub async fn share(
    document: &SchemaDocument,
    driver_tag: &str,
    config: &ShareConfig,
    cancel: &CancellationToken,
) -> Result<String> {
    ShareClient::new(config)?
        .share(document, driver_tag, cancel)
        .await
}

/// Share protocol client bound to one endpoint.
pub struct ShareClient {
    endpoint: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ShareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ShareClient {
    /// Validates `config` and builds the transport.
    ///
    /// # Errors
    /// Returns [`SchemaVizError::Configuration`] for an invalid endpoint or
    /// timeout, or when the HTTP client cannot be built
    pub fn new(config: &ShareConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;

        let transport: Arc<dyn Transport> = match &config.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(HttpTransport::new(config.timeout).map_err(|e| {
                SchemaVizError::configuration(format!("building HTTP client: {}", e))
            })?),
        };

        Ok(Self { endpoint, transport })
    }

    /// Runs both share calls and returns the link.
    ///
    /// # Errors
    /// See [`share`]
    pub async fn share(
        &self,
        document: &SchemaDocument,
        driver_tag: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let text = document.as_str().map_err(|e| {
            SchemaVizError::share_stage(ShareStage::Visualize, ShareProtocolError::Encode(e))
        })?;

        let body = GraphqlRequest::visualize(text, driver_tag)
            .to_body()
            .map_err(|source| SchemaVizError::Serialization {
                context: "visualize request body".to_string(),
                source,
            })?;
        let visualized: VisualizeData = self.call(ShareStage::Visualize, body, cancel).await?;
        let ext_id = visualized.visualize.node.ext_id;
        tracing::debug!(ext_id = %ext_id, "Uploaded schema document");

        let body = GraphqlRequest::share(&ext_id)
            .to_body()
            .map_err(|source| SchemaVizError::Serialization {
                context: "share request body".to_string(),
                source,
            })?;
        let shared: ShareData = self.call(ShareStage::Share, body, cancel).await?;
        if !shared.share_visualization.success {
            return Err(SchemaVizError::ShareFailed { ext_id });
        }

        let link = self.explore_url(&ext_id);
        tracing::info!(link = %link, "Shared schema visualization");
        Ok(link)
    }

    /// Link to a shared visualization on this client's host.
    pub fn explore_url(&self, ext_id: &str) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!(
                "{}://{}:{}/explore/{}",
                self.endpoint.scheme(),
                host,
                port,
                ext_id
            ),
            None => format!("{}://{}/explore/{}", self.endpoint.scheme(), host, ext_id),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        stage: ShareStage,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let label = match stage {
            ShareStage::Visualize => "visualize request",
            ShareStage::Share => "share request",
        };

        let response = cancel::run(cancel, label, async {
            self.transport
                .execute(self.endpoint.as_str(), body)
                .await
                .map_err(|e| SchemaVizError::share_stage(stage, e.into()))
        })
        .await?;

        if response.status != 200 {
            tracing::debug!(status = response.status, %stage, "Share API returned an error status");
            return Err(SchemaVizError::share_stage(
                stage,
                ShareProtocolError::Status(response.status),
            ));
        }

        graphql::decode(&response.body).map_err(|e| SchemaVizError::share_stage(stage, e))
    }
}
