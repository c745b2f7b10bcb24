//! HTTP implementation of [`Capability`] against a flow server.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::capability::{Capability, CapabilityError};
use crate::contract::{
    AdviseRequest, ChatRequest, CorrelateRequest, Flow, NormalizeRequest, ParseScanRequest,
    PrioritizeRequest,
};

/// Default address of a locally running flow server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3400";

/// Request envelope the flow server expects.
#[derive(Serialize)]
struct Envelope<'a, T> {
    data: &'a T,
}

/// Capability backend that invokes flows over HTTP.
///
/// Each flow is served as `POST {base_url}/{flow name}` with the payload
/// wrapped in a `data` envelope; successful replies wrap their output in a
/// `result` envelope, which this client unwraps before returning.
#[derive(Debug, Clone)]
pub struct FlowClient {
    base_url: String,
    http: reqwest::Client,
}

impl FlowClient {
    /// Build a client for the flow server at `base_url`.
    ///
    /// A trailing slash on the base URL is tolerated and trimmed.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("patchwise/0.1"));

        // The builder only fails on malformed default headers; ours are static.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self::with_client(base_url, http)
    }

    /// Build a client around an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, http }
    }

    /// Base URL the client sends flow requests to.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: Serialize>(&self, flow: Flow, payload: &T) -> Result<Value, CapabilityError> {
        let url = format!("{}/{}", self.base_url, flow.name());
        debug!("Invoking flow {} at {}", flow.name(), url);

        let response = self
            .http
            .post(&url)
            .json(&Envelope { data: payload })
            .send()
            .await
            .map_err(|source| CapabilityError::Transport {
                flow: flow.name(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Flow {} refused with HTTP status {}", flow.name(), status.as_u16());
            return Err(CapabilityError::Status {
                flow: flow.name(),
                status: status.as_u16(),
            });
        }

        let mut body: Value =
            response
                .json()
                .await
                .map_err(|source| CapabilityError::Decode {
                    flow: flow.name(),
                    source,
                })?;

        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(CapabilityError::Envelope { flow: flow.name() }),
        }
    }
}

impl Default for FlowClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Capability for FlowClient {
    async fn normalize_feed(&self, request: NormalizeRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::Normalize, &request).await
    }

    async fn parse_scan(&self, request: ParseScanRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::ParseScan, &request).await
    }

    async fn correlate(&self, request: CorrelateRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::Correlate, &request).await
    }

    async fn prioritize(&self, request: PrioritizeRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::Prioritize, &request).await
    }

    async fn advise(&self, request: AdviseRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::Advise, &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<Value, CapabilityError> {
        self.call(Flow::Chat, &request).await
    }
}
