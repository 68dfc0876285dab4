//! Inbound payload and proxy event shapes.
//!
//! The chain core treats the inbound event as an opaque blob and the outbound
//! response as any serializable value; these types are the formatting glue
//! for the common HTTP/websocket proxy integrations. JSON field names follow
//! the gateway's camelCase wire format, and deserialization is lenient:
//! every field defaults when absent.

use std::collections::HashMap;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod consts;

/// The opaque inbound invocation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(pub Vec<u8>);

impl Payload {
    /// Decode the payload as JSON into `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }

    /// Decode as an HTTP proxy request event.
    pub fn request(&self) -> Result<ProxyRequest, serde_json::Error> {
        self.parse()
    }

    /// Decode as a websocket proxy request event.
    pub fn ws_request(&self) -> Result<WsProxyRequest, serde_json::Error> {
        self.parse()
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// An HTTP proxy request event as decoded from the inbound payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyRequest {
    pub resource: String,
    pub path: String,
    pub http_method: String,
    pub headers: HashMap<String, String>,
    pub query_string_parameters: HashMap<String, String>,
    pub path_parameters: HashMap<String, String>,
    pub stage_variables: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// A websocket proxy request event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WsProxyRequest {
    pub body: String,
    pub is_base64_encoded: bool,
    pub request_context: WsRequestContext,
}

/// Connection-level metadata carried by websocket proxy events.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WsRequestContext {
    pub connection_id: String,
    pub route_key: String,
    pub event_type: String,
    pub domain_name: String,
    pub stage: String,
}

/// The outbound HTTP proxy response event.
///
/// Empty headers and a false base64 flag are omitted from the wire encoding.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    pub body: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_base64_encoded: bool,
}
