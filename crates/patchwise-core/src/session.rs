//! Operator session facade
//!
//! The session is the single entry point for everything an operator does:
//! - Runs the six capability pipelines and commits admitted results
//! - Owns the three in-memory stores and the operating mode
//! - Persists the authenticated and demo-mode flags across restarts
//!
//! One session means one logical thread of control: store mutation happens
//! through `&mut self`, so every operation is atomic from the caller's
//! perspective and a failed pipeline leaves all stores untouched.

use std::sync::Arc;

use patchwise_ai::{
    AdviseRequest, Capability, ChatRequest, CorrelateRequest, NormalizeRequest, ParseScanRequest,
    PrioritizeRequest,
};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::dashboard::{self, DashboardSummary};
use crate::demo;
use crate::error::{PipelineError, PrefsError};
use crate::model::{Advisory, Mode, Patch, PatchDraft, Status};
use crate::pipeline;
use crate::prefs::{Preferences, PrefsStore};
use crate::store::{AddReport, AssetStore, PatchStore, VulnerabilityStore};

/// Outcome of a scan import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImport {
    /// Services appended to the asset store
    pub added: usize,
    /// Narrative summary produced by the parser
    pub summary: String,
}

/// One operator's working state.
///
/// Built from a capability backend and a [`SessionConfig`]. Construction
/// never fails: a missing or unreadable preference file falls back to the
/// defaults (logged out, Demo mode), and an explicit mode in the config
/// overrides whatever was persisted.
#[derive(Debug)]
pub struct Session {
    /// AI backend serving the capability flows
    capability: Arc<dyn Capability>,
    /// Preference persistence, absent when no path was configured
    prefs: Option<PrefsStore>,
    /// Current operating mode
    mode: Mode,
    /// Whether the operator has logged in
    authenticated: bool,
    /// Tracked vulnerability records
    vulnerabilities: VulnerabilityStore,
    /// Scanned service inventory
    assets: AssetStore,
    /// Patch recommendations
    patches: PatchStore,
}

impl Session {
    /// Create a session.
    ///
    /// The operating mode is resolved in order: explicit `config.mode`,
    /// then the persisted demo-mode flag, then Demo. A session that starts
    /// in Demo mode has its stores seeded with the demonstration dataset;
    /// a Live session starts empty.
    #[must_use]
    pub fn new(capability: Arc<dyn Capability>, config: SessionConfig) -> Self {
        let prefs = config.prefs_path.map(PrefsStore::new);
        let stored = match prefs.as_ref().map(PrefsStore::load) {
            Some(Ok(stored)) => stored,
            Some(Err(error)) => {
                warn!(
                    "Could not read preferences ({}), starting from defaults",
                    error
                );
                Preferences::default()
            }
            None => Preferences::default(),
        };

        let mode = config
            .mode
            .unwrap_or_else(|| Mode::from_demo_flag(stored.demo_mode));

        let mut session = Self {
            capability,
            prefs,
            mode,
            authenticated: stored.authenticated,
            vulnerabilities: VulnerabilityStore::new(),
            assets: AssetStore::new(),
            patches: PatchStore::new(),
        };
        session.reset_stores();
        session
    }

    /// Current operating mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the operator has logged in
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Tracked vulnerability records
    #[inline]
    #[must_use]
    pub fn vulnerabilities(&self) -> &VulnerabilityStore {
        &self.vulnerabilities
    }

    /// Scanned service inventory
    #[inline]
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Patch recommendations
    #[inline]
    #[must_use]
    pub fn patches(&self) -> &PatchStore {
        &self.patches
    }

    /// Ingest a raw vulnerability feed.
    ///
    /// # Workflow
    /// 1. Send the raw feed to the normalize flow
    /// 2. Check the acknowledgement flag, surfacing a backend rejection
    /// 3. Validate the reply shape and parse the normalized document
    /// 4. Assign identities and add the items, skipping duplicates
    ///
    /// Re-ingesting a feed whose items carry their own identifiers is
    /// idempotent; every duplicate is counted in the returned report.
    pub async fn ingest_feed(
        &mut self,
        source: &str,
        data: &str,
    ) -> Result<AddReport, PipelineError> {
        info!("Ingesting vulnerability feed from {}", source);

        let reply = self
            .capability
            .normalize_feed(NormalizeRequest::new(source, data))
            .await
            .map_err(|e| PipelineError::Ingest(e.into()))?;

        let drafts = pipeline::normalized_items(&reply).map_err(PipelineError::Ingest)?;
        let report = self.vulnerabilities.add_all(drafts);

        info!(
            "Feed ingested: {} added, {} duplicates skipped",
            report.added, report.duplicates
        );
        Ok(report)
    }

    /// Import a service scan document.
    ///
    /// The parse flow turns raw scan XML into structured service entries;
    /// once the reply is admitted they are appended to the asset store
    /// verbatim. Repeated imports accumulate rather than merge.
    pub async fn import_scan(&mut self, xml: &str) -> Result<ScanImport, PipelineError> {
        info!("Importing service scan ({} bytes)", xml.len());

        let reply = self
            .capability
            .parse_scan(ParseScanRequest::new(xml))
            .await
            .map_err(|e| PipelineError::ScanImport(e.into()))?;

        let scan = pipeline::scan_reply(&reply).map_err(PipelineError::ScanImport)?;
        let added = self.assets.add_all(scan.services);

        info!("Scan imported: {} services added", added);
        Ok(ScanImport {
            added,
            summary: scan.summary,
        })
    }

    /// Correlate vulnerability data with an asset inventory.
    ///
    /// Both inputs are free-form text. The mapping report comes back as
    /// text as well and is never stored.
    pub async fn correlate(
        &self,
        vulnerability_data: &str,
        asset_inventory_data: &str,
    ) -> Result<String, PipelineError> {
        info!("Correlating vulnerability data with asset inventory");

        let reply = self
            .capability
            .correlate(CorrelateRequest::new(
                vulnerability_data,
                asset_inventory_data,
            ))
            .await
            .map_err(|e| PipelineError::Correlate(e.into()))?;

        pipeline::correlation_report(&reply).map_err(PipelineError::Correlate)
    }

    /// Request patch prioritization and store the recommendations.
    ///
    /// When no scan description is supplied, one is synthesized from the
    /// current asset store (see [`Session::scan_description`]). The reply
    /// is committed whole or not at all: a single bad element rejects the
    /// entire batch and the patch store keeps its prior contents.
    pub async fn prioritize(&mut self, scan: Option<&str>) -> Result<usize, PipelineError> {
        let description = match scan {
            Some(description) => description.to_owned(),
            None => pipeline::scan_description(self.assets.records()),
        };
        info!("Requesting patch prioritization");

        let reply = self
            .capability
            .prioritize(PrioritizeRequest::new(description))
            .await
            .map_err(|e| PipelineError::Prioritize(e.into()))?;

        let drafts = pipeline::patch_drafts(&reply).map_err(PipelineError::Prioritize)?;
        let added = self.patches.add_bulk(drafts);

        info!("Prioritization stored {} patch recommendations", added);
        Ok(added)
    }

    /// Request remediation advice.
    ///
    /// A display artifact like the mapping report; nothing is stored.
    pub async fn advise(
        &self,
        vulnerability_analysis: &str,
        asset_criticality: &str,
        vendor_advisories: Option<&str>,
    ) -> Result<Advisory, PipelineError> {
        info!("Requesting remediation advice");

        let mut request = AdviseRequest::new(vulnerability_analysis, asset_criticality);
        if let Some(advisories) = vendor_advisories {
            request = request.with_vendor_advisories(advisories);
        }

        let reply = self
            .capability
            .advise(request)
            .await
            .map_err(|e| PipelineError::Advise(e.into()))?;

        pipeline::advisory(&reply).map_err(PipelineError::Advise)
    }

    /// Ask the backend a free-form question.
    pub async fn chat(&self, query: &str) -> Result<String, PipelineError> {
        let reply = self
            .capability
            .chat(ChatRequest::new(query))
            .await
            .map_err(|e| PipelineError::Chat(e.into()))?;

        pipeline::chat_response(&reply).map_err(PipelineError::Chat)
    }

    /// Compute the dashboard view model.
    ///
    /// Demo mode answers the fixed demonstration aggregate regardless of
    /// store contents; Live mode aggregates the stores.
    #[must_use]
    pub fn dashboard(&self) -> DashboardSummary {
        if self.mode.is_demo() {
            demo::summary()
        } else {
            dashboard::aggregate(&self.vulnerabilities, &self.assets, &self.patches)
        }
    }

    /// Render the current asset store as a scan-result document.
    #[must_use]
    pub fn scan_description(&self) -> String {
        pipeline::scan_description(self.assets.records())
    }

    /// Change a vulnerability's status.
    ///
    /// Returns whether a record was touched; an unknown `id` is a no-op.
    pub fn set_vulnerability_status(&mut self, id: &str, status: Status) -> bool {
        self.vulnerabilities.set_status(id, status)
    }

    /// Create a patch recommendation by hand.
    pub fn create_patch(&mut self, draft: PatchDraft) -> &Patch {
        self.patches.create(draft)
    }

    /// Replace the fields of an existing patch recommendation.
    pub fn update_patch(&mut self, id: &str, draft: PatchDraft) -> bool {
        self.patches.update(id, draft)
    }

    /// Delete a patch recommendation.
    pub fn remove_patch(&mut self, id: &str) -> bool {
        self.patches.remove(id)
    }

    /// Switch the operating mode.
    ///
    /// Switching to Demo seeds all three stores with the demonstration
    /// dataset; switching to Live clears them. Setting the current mode
    /// again is a no-op. The demo-mode flag is persisted on every actual
    /// switch.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), PrefsError> {
        if self.mode == mode {
            return Ok(());
        }
        self.mode = mode;
        self.reset_stores();
        info!("Operating mode switched to {:?}", mode);
        self.persist()
    }

    /// Authenticate the operator.
    ///
    /// Returns whether the credentials were accepted. Success persists the
    /// authenticated flag; failure changes nothing.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool, PrefsError> {
        if username == "admin" && password == "admin" {
            self.authenticated = true;
            self.persist()?;
            info!("Operator authenticated");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Log the operator out, clearing the persisted flag.
    pub fn logout(&mut self) -> Result<(), PrefsError> {
        self.authenticated = false;
        self.persist()
    }

    fn reset_stores(&mut self) {
        if self.mode.is_demo() {
            self.vulnerabilities.replace_all(demo::vulnerabilities());
            self.assets.replace_all(demo::assets());
            self.patches.replace_all(demo::patches());
        } else {
            self.vulnerabilities.replace_all(Vec::new());
            self.assets.replace_all(Vec::new());
            self.patches.replace_all(Vec::new());
        }
    }

    fn persist(&self) -> Result<(), PrefsError> {
        match &self.prefs {
            Some(store) => store.save(&Preferences {
                authenticated: self.authenticated,
                demo_mode: self.mode.demo_flag(),
            }),
            None => Ok(()),
        }
    }
}
