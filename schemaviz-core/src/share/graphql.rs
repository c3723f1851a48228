//! GraphQL payloads of the share protocol.

use crate::error::ShareProtocolError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Uploads a schema document and returns its external id.
pub const VISUALIZE_MUTATION: &str = "mutation VisualizeMutation($text: String!, $driver: Driver!) {
  visualize(input: { text: $text, type: HCL, driver: $driver }) {
    node {
      extID
    }
  }
}
";

/// Makes an uploaded visualization publicly reachable.
pub const SHARE_VISUALIZATION_MUTATION: &str = "mutation ShareVisualizationMutation($extID: String!) {
  shareVisualization(input: { fromID: $extID }) {
    success
  }
}
";

/// A `{query, variables}` request body.
///
/// Variables are typed structs whose fields are declared in key order, so
/// the serialized body is identical on every run.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<V> {
    /// Mutation text
    pub query: &'static str,
    /// Typed variables of the mutation
    pub variables: V,
}

/// Variables of [`VISUALIZE_MUTATION`].
#[derive(Debug, Clone, Serialize)]
pub struct VisualizeVariables<'a> {
    /// Driver tag of the dialect the document was marshaled for
    pub driver: &'a str,
    /// The schema document
    pub text: &'a str,
}

/// Variables of [`SHARE_VISUALIZATION_MUTATION`].
#[derive(Debug, Clone, Serialize)]
pub struct ShareVariables<'a> {
    /// External id returned by the visualize call
    #[serde(rename = "extID")]
    pub ext_id: &'a str,
}

impl<'a> GraphqlRequest<VisualizeVariables<'a>> {
    /// Visualize request for `text` marshaled by `driver`.
    pub fn visualize(text: &'a str, driver: &'a str) -> Self {
        Self {
            query: VISUALIZE_MUTATION,
            variables: VisualizeVariables { driver, text },
        }
    }
}

impl<'a> GraphqlRequest<ShareVariables<'a>> {
    /// Share request for an uploaded visualization.
    pub fn share(ext_id: &'a str) -> Self {
        Self {
            query: SHARE_VISUALIZATION_MUTATION,
            variables: ShareVariables { ext_id },
        }
    }
}

impl<V: Serialize> GraphqlRequest<V> {
    /// Serializes the request as a JSON body.
    ///
    /// # Errors
    /// Returns the serializer error (only possible for non-string map keys)
    pub fn to_body(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

/// Response envelope `{data, errors}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

/// Decodes an envelope, surfacing remote errors and missing data.
///
/// # Errors
/// - [`ShareProtocolError::Decode`] if the body is not the expected JSON shape
/// - [`ShareProtocolError::Graphql`] if the envelope carries errors
/// - [`ShareProtocolError::MissingData`] if `data` is absent or null
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ShareProtocolError> {
    let envelope: Envelope<T> = serde_json::from_slice(body).map_err(ShareProtocolError::Decode)?;

    if !envelope.errors.is_empty() {
        return Err(ShareProtocolError::Graphql(
            envelope.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    envelope.data.ok_or(ShareProtocolError::MissingData)
}

/// `data` of the visualize call.
#[derive(Debug, Deserialize)]
pub struct VisualizeData {
    /// Result of the `visualize` mutation
    pub visualize: VisualizePayload,
}

/// Payload of the `visualize` mutation.
#[derive(Debug, Deserialize)]
pub struct VisualizePayload {
    /// The stored visualization
    pub node: VisualizeNode,
}

/// A stored visualization.
#[derive(Debug, Deserialize)]
pub struct VisualizeNode {
    /// External id used by the share call and the link
    #[serde(rename = "extID")]
    pub ext_id: String,
}

/// `data` of the share call.
#[derive(Debug, Deserialize)]
pub struct ShareData {
    /// Result of the `shareVisualization` mutation
    #[serde(rename = "shareVisualization")]
    pub share_visualization: SharePayload,
}

/// Payload of the `shareVisualization` mutation.
#[derive(Debug, Deserialize)]
pub struct SharePayload {
    /// False when the service refused to share
    pub success: bool,
}
