//! # PatchWise AI
//!
//! The boundary between the deterministic core and its AI backends.
//!
//! ## Overview
//!
//! Every analysis step in PatchWise is delegated to a named capability
//! flow: normalizing a vulnerability feed, parsing a service scan,
//! correlating vulnerabilities with assets, prioritizing patches, advising
//! on remediation, and answering analyst questions. This crate defines:
//!
//! - [`contract`]: the request payload types and the declared reply shape
//!   for each flow, keyed by [`Flow`],
//! - [`capability`]: the [`Capability`] trait every backend implements,
//!   returning raw [`serde_json::Value`] replies that the caller must
//!   validate before trusting,
//! - [`client`]: [`FlowClient`], the HTTP implementation that talks to a
//!   flow server.
//!
//! Replies are deliberately untyped here. Backends are free-form text
//! models and their output is treated as untrusted until it has passed the
//! shape gate in `patchwise-schema`, so the trait surface hands back raw
//! JSON and nothing else.
//!
//! ## Example
//!
//! ```
//! use patchwise_ai::{Flow, FlowClient};
//!
//! let client = FlowClient::new("http://127.0.0.1:3400/");
//! assert_eq!(Flow::Chat.name(), "queryVulnerabilityInformationFlow");
//! assert_eq!(client.base_url(), "http://127.0.0.1:3400");
//! ```

pub mod capability;
pub mod client;
pub mod contract;

pub use capability::{Capability, CapabilityError};
pub use client::FlowClient;
pub use contract::{
    AdviseRequest, ChatRequest, CorrelateRequest, Flow, NormalizeRequest, ParseScanRequest,
    PrioritizeRequest,
};

/// Current version of the AI boundary library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capability::{Capability, CapabilityError};
    pub use crate::client::FlowClient;
    pub use crate::contract::{
        AdviseRequest, ChatRequest, CorrelateRequest, Flow, NormalizeRequest, ParseScanRequest,
        PrioritizeRequest,
    };
}
