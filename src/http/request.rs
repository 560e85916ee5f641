//! Request handling and transformation.
//!
//! # Responsibilities
//! - Assign every inbound request an `x-request-id`
//! - Capture the parts of an inbound request a relay needs (wildcard path,
//!   query pairs, body)
//! - Build the authenticated outbound request descriptor for a backend

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::http::{HeaderValue, Request};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::config::ConfigEntry;

/// Ordered query pairs. Repeated keys are kept, so `a=1&a=2` survives a relay.
pub type QueryParams = Vec<(String, String)>;

/// Generates a UUID v4 `x-request-id` for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// What a relay needs from an inbound request.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    /// Trailing wildcard segment of the route, without the leading slash.
    pub path: String,
    pub query: QueryParams,
    pub body: Bytes,
    pub content_type: Option<HeaderValue>,
}

impl InboundRequest {
    /// Capture a bodyless request from its wildcard path and raw query string.
    pub fn new(path: impl Into<String>, raw_query: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query: parse_query(raw_query.unwrap_or_default()),
            ..Default::default()
        }
    }

    /// Attach the body to relay, with its content type.
    pub fn with_body(mut self, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        self.content_type = content_type;
        self.body = body;
        self
    }

    /// The inbound query with `key` set to `value`, replacing any value the
    /// caller sent for it.
    pub fn query_with(&self, key: &str, value: &str) -> QueryParams {
        let mut query: QueryParams = self
            .query
            .iter()
            .filter(|(existing, _)| existing != key)
            .cloned()
            .collect();
        query.push((key.to_string(), value.to_string()));
        query
    }
}

fn parse_query(raw: &str) -> QueryParams {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}

/// Everything needed to issue one authenticated call to a backend.
///
/// Built per inbound request and dropped once the call completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub target_path: String,
    /// `host[:port]` of the backend.
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub query: QueryParams,
}

impl OutboundRequest {
    /// Descriptor carrying `Authorization: Basic base64(username:password)`.
    ///
    /// The caller must already have checked that `entry.password` is set.
    pub fn basic_auth(inbound: &InboundRequest, entry: &ConfigEntry) -> Self {
        let credentials = format!(
            "{}:{}",
            entry.username.as_deref().unwrap_or_default(),
            entry.password.as_deref().unwrap_or_default()
        );
        let mut headers = BTreeMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Basic {}", STANDARD.encode(credentials)),
        );

        Self {
            target_path: inbound.path.clone(),
            base_url: entry.base_url(),
            headers,
            query: inbound.query.clone(),
        }
    }

    /// Descriptor for API-key backends.
    ///
    /// With `header_name` the key is sent in that header. `query` replaces the
    /// inbound query; backends that take the key as a query parameter get it
    /// that way, since no header is set without `header_name`.
    pub fn api_key(
        inbound: &InboundRequest,
        entry: &ConfigEntry,
        header_name: Option<&str>,
        query: Option<QueryParams>,
    ) -> Self {
        let mut headers = BTreeMap::new();
        if let (Some(name), Some(key)) = (header_name, entry.apikey.as_deref()) {
            headers.insert(name.to_string(), key.to_string());
        }

        Self {
            target_path: inbound.path.clone(),
            base_url: entry.base_url(),
            headers,
            query: query.unwrap_or_else(|| inbound.query.clone()),
        }
    }

    /// Absolute URL of the call, without the query.
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.target_path.trim_start_matches('/')
        )
    }
}
