//! Core domain types for PatchWise
//!
//! Defines the canonical records the stores hold:
//! - Vulnerability records and their severity/status enumerations
//! - Asset (service) records from scan imports
//! - Patch recommendations and their drafts
//! - The session operating mode

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Severity levels, shared by vulnerabilities and patch priorities.
///
/// Wire values are the capitalized names. Declaration order is the fixed
/// chart order, so `ALL` can be iterated when building histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

impl Severity {
    /// All levels in fixed chart order
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Wire and display name of the level
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parse a source value; recognition is exact, no case folding
    #[inline]
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            "Critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a vulnerability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Newly ingested, not yet triaged
    New,
    /// Under active investigation
    Investigating,
    /// Remediated by a patch
    Patched,
    /// Determined not to be a real finding
    #[serde(rename = "False Positive")]
    FalsePositive,
}

impl Status {
    /// All recognized statuses
    pub const ALL: [Status; 4] = [
        Status::New,
        Status::Investigating,
        Status::Patched,
        Status::FalsePositive,
    ];

    /// Wire and display name of the status
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Investigating => "Investigating",
            Status::Patched => "Patched",
            Status::FalsePositive => "False Positive",
        }
    }

    /// Parse a source value; recognition is exact, no case folding
    #[inline]
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "New" => Some(Status::New),
            "Investigating" => Some(Status::Investigating),
            "Patched" => Some(Status::Patched),
            "False Positive" => Some(Status::FalsePositive),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::New
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported state of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Port accepts connections
    Open,
    /// Port refuses connections
    Closed,
    /// Port is filtered by a firewall
    Filtered,
}

impl PortState {
    /// Wire and display name of the state
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PortState::Open => "open",
            PortState::Closed => "closed",
            PortState::Filtered => "filtered",
        }
    }
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Live aggregation over the stores
    Live,
    /// Fixed demonstration data
    Demo,
}

impl Mode {
    /// Check if the mode is demonstration mode
    #[inline]
    #[must_use]
    pub const fn is_demo(&self) -> bool {
        matches!(self, Mode::Demo)
    }

    /// Build a mode from the persisted demo-mode flag
    #[inline]
    #[must_use]
    pub const fn from_demo_flag(demo: bool) -> Self {
        if demo {
            Mode::Demo
        } else {
            Mode::Live
        }
    }

    /// The demo-mode flag value this mode persists as
    #[inline]
    #[must_use]
    pub const fn demo_flag(&self) -> bool {
        self.is_demo()
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Demo
    }
}

/// A tracked vulnerability record.
///
/// The core schema is fixed (`id`, `severity`, `status`); everything else
/// the source carried lives in the extension map, preserved but not
/// interpreted. A record with no recognized severity keeps the raw source
/// value under the `severity` key of the extension map and is ignored by
/// severity-based aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Unique identifier, stable for the record's lifetime
    pub id: String,
    /// Recognized severity, if the source carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Lifecycle status
    pub status: Status,
    /// Source-specific fields, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A vulnerability as it arrives from the ingestion pipeline, before
/// identity assignment and defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VulnerabilityDraft {
    /// Source-supplied identifier, if any
    pub id: Option<String>,
    /// Recognized severity, if any
    pub severity: Option<Severity>,
    /// Recognized status, if any
    pub status: Option<Status>,
    /// Remaining source fields
    pub extra: BTreeMap<String, Value>,
}

impl VulnerabilityDraft {
    /// Create an empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a source-supplied identifier
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With a severity
    #[inline]
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// With a status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// With an extension field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Build a draft from one raw item of a normalized feed.
    ///
    /// Total over any JSON value. For objects, `id` is taken from string or
    /// number fields (numbers rendered to their canonical form); any other
    /// `id` type is discarded so a fresh identity gets assigned. Recognized
    /// `severity` and `status` values populate the typed fields, an
    /// unrecognized severity stays in the extension map under its original
    /// key, and an unrecognized status is discarded so that the record
    /// enters as `New`. The assigned `id` and `status` always serialize, so
    /// their raw values never stay in the extension map where the flatten
    /// would emit the key twice. A non-object item is preserved whole under
    /// the `value` key of the extension map.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            let mut extra = BTreeMap::new();
            extra.insert("value".to_owned(), value);
            return Self {
                extra,
                ..Self::default()
            };
        };

        let mut extra: BTreeMap<String, Value> = map.into_iter().collect();

        let id = match extra.remove("id") {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let severity = match extra.remove("severity") {
            Some(Value::String(s)) => match Severity::parse(&s) {
                Some(severity) => Some(severity),
                None => {
                    extra.insert("severity".to_owned(), Value::String(s));
                    None
                }
            },
            Some(other) => {
                extra.insert("severity".to_owned(), other);
                None
            }
            None => None,
        };

        let status = match extra.remove("status") {
            Some(Value::String(s)) => Status::parse(&s),
            _ => None,
        };

        Self {
            id,
            severity,
            status,
            extra,
        }
    }
}

/// A service discovered by a scan import.
///
/// Assets carry no identifier; the asset store is an ordered, append-only
/// log and repeated scans may record the same service more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Port the service listens on
    pub port: u16,
    /// Transport protocol, e.g. `tcp` or `udp`
    pub protocol: String,
    /// Service name as reported by the scan
    pub service_name: String,
    /// Service version as reported by the scan
    pub service_version: String,
    /// Reported port state
    pub state: PortState,
}

impl Asset {
    /// Create an asset record
    #[inline]
    #[must_use]
    pub fn new(
        port: u16,
        protocol: impl Into<String>,
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        state: PortState,
    ) -> Self {
        Self {
            port,
            protocol: protocol.into(),
            service_name: service_name.into(),
            service_version: service_version.into(),
            state,
        }
    }
}

/// A stored patch recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    /// Unique identifier, generated at creation time
    pub id: String,
    /// Service the patch applies to
    pub service: String,
    /// Version currently running
    pub current_version: String,
    /// Recommended patch or upgrade version
    pub recommended_patch: String,
    /// Rationale for the recommendation, including CVEs addressed
    pub rationale: String,
    /// Patch priority
    pub priority: Severity,
}

impl Patch {
    /// Build a patch record from a draft and an assigned identifier
    #[inline]
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: PatchDraft) -> Self {
        Self {
            id: id.into(),
            service: draft.service,
            current_version: draft.current_version,
            recommended_patch: draft.recommended_patch,
            rationale: draft.rationale,
            priority: draft.priority,
        }
    }
}

/// A patch recommendation before identity assignment.
///
/// This is also the wire form of one prioritize reply element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDraft {
    /// Service the patch applies to
    pub service: String,
    /// Version currently running
    pub current_version: String,
    /// Recommended patch or upgrade version
    pub recommended_patch: String,
    /// Rationale for the recommendation
    pub rationale: String,
    /// Patch priority
    pub priority: Severity,
}

impl PatchDraft {
    /// Create a patch draft
    #[inline]
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        current_version: impl Into<String>,
        recommended_patch: impl Into<String>,
        rationale: impl Into<String>,
        priority: Severity,
    ) -> Self {
        Self {
            service: service.into(),
            current_version: current_version.into(),
            recommended_patch: recommended_patch.into(),
            rationale: rationale.into(),
            priority,
        }
    }
}

/// Remediation advice produced by the advisory pipeline.
///
/// A display artifact; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Prioritized patch recommendations as free text
    pub patch_recommendations: String,
    /// Justification for the recommendations
    pub justification: String,
}
