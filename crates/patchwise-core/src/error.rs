//! Error types for the PatchWise core
//!
//! Provides error handling for:
//! - Capability flow failures (transport, schema, decode, rejection)
//! - Pipeline-scoped failures (one variant per pipeline)
//! - Preference file access

use patchwise_ai::CapabilityError;
use patchwise_schema::SchemaViolation;
use std::path::PathBuf;

/// Why a capability flow's output could not be admitted.
///
/// A failed flow leaves every store untouched; these are reported to the
/// caller and never retried by the core.
#[derive(Debug, thiserror::Error)]
pub enum FlowFailure {
    /// The reply did not satisfy its declared shape
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// The backend could not be reached or answered out of protocol
    #[error("capability failed: {0}")]
    Capability(#[from] CapabilityError),

    /// The reply passed its shape gate but would not decode into the model
    #[error("payload decode failed: {0}")]
    Payload(#[from] serde_json::Error),

    /// The backend reported it could not fulfil the request
    #[error("rejected by backend: {0}")]
    Rejected(String),

    /// The reply decoded but its content is unusable
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl FlowFailure {
    /// Check if the failure was a validation gate rejection
    #[inline]
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// A pipeline that could not complete.
///
/// Each variant scopes a [`FlowFailure`] to the pipeline it occurred in.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Feed ingestion failed
    #[error("feed ingestion failed: {0}")]
    Ingest(#[source] FlowFailure),

    /// Scan import failed
    #[error("scan import failed: {0}")]
    ScanImport(#[source] FlowFailure),

    /// Correlation failed
    #[error("correlation failed: {0}")]
    Correlate(#[source] FlowFailure),

    /// Prioritization failed
    #[error("prioritization failed: {0}")]
    Prioritize(#[source] FlowFailure),

    /// Advisory failed
    #[error("advisory failed: {0}")]
    Advise(#[source] FlowFailure),

    /// Chat query failed
    #[error("chat query failed: {0}")]
    Chat(#[source] FlowFailure),
}

impl PipelineError {
    /// The underlying flow failure
    #[inline]
    #[must_use]
    pub fn cause(&self) -> &FlowFailure {
        match self {
            Self::Ingest(cause)
            | Self::ScanImport(cause)
            | Self::Correlate(cause)
            | Self::Prioritize(cause)
            | Self::Advise(cause)
            | Self::Chat(cause) => cause,
        }
    }
}

/// Errors accessing the preference file
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// IO error reading or writing the preference file
    #[error("io error on preference file {path}: {source}")]
    Io {
        /// Preference file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Preferences could not be encoded for writing
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PrefsError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
