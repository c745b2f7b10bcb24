//! The capability trait implemented by every AI backend.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::contract::{
    AdviseRequest, ChatRequest, CorrelateRequest, NormalizeRequest, ParseScanRequest,
    PrioritizeRequest,
};

/// Failure while reaching a capability backend or reading its reply.
///
/// These cover the transport and framing layer only. A reply that arrives
/// intact but does not satisfy its declared shape is not a capability
/// error; the caller's validation gate reports that separately.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The request never completed.
    #[error("flow `{flow}` transport failed")]
    Transport {
        /// Endpoint name of the flow being invoked.
        flow: &'static str,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success HTTP status.
    #[error("flow `{flow}` returned status {status}")]
    Status {
        /// Endpoint name of the flow being invoked.
        flow: &'static str,
        /// HTTP status code received.
        status: u16,
    },
    /// The reply body was not valid JSON.
    #[error("flow `{flow}` reply was not valid JSON")]
    Decode {
        /// Endpoint name of the flow being invoked.
        flow: &'static str,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
    /// The reply parsed but carried no `result` envelope.
    #[error("flow `{flow}` reply carried no result envelope")]
    Envelope {
        /// Endpoint name of the flow being invoked.
        flow: &'static str,
    },
    /// The backend is not reachable in the current configuration.
    #[error("flow `{flow}` unavailable: {reason}")]
    Unavailable {
        /// Endpoint name of the flow being invoked.
        flow: &'static str,
        /// Why the backend could not serve the call.
        reason: String,
    },
}

impl CapabilityError {
    /// Endpoint name of the flow the failure occurred on.
    #[inline]
    #[must_use]
    pub const fn flow(&self) -> &'static str {
        match self {
            Self::Transport { flow, .. }
            | Self::Status { flow, .. }
            | Self::Decode { flow, .. }
            | Self::Envelope { flow }
            | Self::Unavailable { flow, .. } => flow,
        }
    }
}

/// An AI backend able to serve the capability flows.
///
/// Implementations return the raw reply as [`Value`]. Callers must treat
/// that value as untrusted and validate it against the flow's declared
/// shape before decoding anything out of it.
#[async_trait]
pub trait Capability: Send + Sync + std::fmt::Debug {
    /// Normalize a raw vulnerability feed into record JSON.
    async fn normalize_feed(&self, request: NormalizeRequest) -> Result<Value, CapabilityError>;

    /// Parse service scan XML into structured service entries.
    async fn parse_scan(&self, request: ParseScanRequest) -> Result<Value, CapabilityError>;

    /// Correlate vulnerability data with asset inventory.
    async fn correlate(&self, request: CorrelateRequest) -> Result<Value, CapabilityError>;

    /// Produce prioritized patch recommendations from scan XML.
    async fn prioritize(&self, request: PrioritizeRequest) -> Result<Value, CapabilityError>;

    /// Advise on remediation given analysis and asset criticality.
    async fn advise(&self, request: AdviseRequest) -> Result<Value, CapabilityError>;

    /// Answer a free-form analyst question.
    async fn chat(&self, request: ChatRequest) -> Result<Value, CapabilityError>;
}
