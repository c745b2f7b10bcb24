//! PatchWise Core - vulnerability posture orchestration and state
//!
//! The deterministic center of PatchWise:
//! - Turns normalized vulnerability feeds into tracked records
//! - Imports service scans into an append-only asset inventory
//! - Stores patch recommendations and keeps them editable
//! - Aggregates everything into a dashboard view model
//! - Persists the authenticated and demo-mode flags across restarts
//!
//! Every AI reply crosses the shape gate in `patchwise-schema` before any
//! store is touched; a failed pipeline leaves all three stores unchanged.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use patchwise_core::{Mode, Session, SessionConfig};
//! use patchwise_test_utils::ScriptedCapability;
//!
//! let config = SessionConfig::new().with_mode(Mode::Live);
//! let mut session = Session::new(Arc::new(ScriptedCapability::new()), config);
//!
//! assert!(session.vulnerabilities().is_empty());
//! assert!(session.login("admin", "admin").unwrap());
//! assert_eq!(session.dashboard().total_vulnerabilities, 0);
//! ```

// Core modules
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod ident;
pub mod model;
pub mod prefs;
pub mod session;
pub mod status;
pub mod store;

mod pipeline;

// Re-exports for convenience
pub use config::SessionConfig;
pub use dashboard::{DashboardSummary, SeveritySlice};
pub use error::{FlowFailure, PipelineError, PrefsError};
pub use model::{
    Advisory, Asset, Mode, Patch, PatchDraft, PortState, Severity, Status, Vulnerability,
    VulnerabilityDraft,
};
pub use prefs::{Preferences, PrefsStore};
pub use session::{ScanImport, Session};
pub use store::{AddReport, AssetStore, PatchStore, VulnerabilityStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with PatchWise Core
    pub use crate::{
        AddReport, Advisory, Asset, DashboardSummary, Mode, Patch, PatchDraft, PipelineError,
        ScanImport, Session, SessionConfig, Severity, Status, Vulnerability, VulnerabilityDraft,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
