//! Wire contracts for the capability flows.
//!
//! Each flow has a request payload type, a stable endpoint name, and a
//! declared reply shape. Field names follow the backend's camelCase wire
//! convention, so every payload struct carries a serde rename rule rather
//! than leaking wire casing into Rust code.

use patchwise_schema::{Field, Shape};
use serde::{Deserialize, Serialize};

/// The capability flows the session can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Normalize a raw vulnerability feed into record JSON.
    Normalize,
    /// Parse service scan XML into structured service entries.
    ParseScan,
    /// Correlate vulnerability data with asset inventory.
    Correlate,
    /// Produce prioritized patch recommendations from scan XML.
    Prioritize,
    /// Advise on remediation given analysis and asset criticality.
    Advise,
    /// Answer a free-form analyst question.
    Chat,
}

impl Flow {
    /// Endpoint name the flow is served under.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Normalize => "ingestVulnerabilityDataFlow",
            Self::ParseScan => "parseNmapServiceScanFlow",
            Self::Correlate => "mapVulnerabilitiesToAssetsFlow",
            Self::Prioritize => "prioritizePatchesFlow",
            Self::Advise => "providePatchRecommendationsFlow",
            Self::Chat => "queryVulnerabilityInformationFlow",
        }
    }

    /// Shape a successful reply must satisfy before it is decoded.
    #[inline]
    #[must_use]
    pub const fn reply_shape(&self) -> &'static Shape {
        match self {
            Self::Normalize => &NORMALIZE_REPLY,
            Self::ParseScan => &PARSE_SCAN_REPLY,
            Self::Correlate => &CORRELATE_REPLY,
            Self::Prioritize => &PRIORITIZE_REPLY,
            Self::Advise => &ADVISE_REPLY,
            Self::Chat => &CHAT_REPLY,
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Acknowledgement part of a normalize reply, checked before anything else.
///
/// A backend may answer `success: false` with only a message attached, so
/// the full [`NORMALIZE_REPLY`] shape is enforced only once the flag has
/// been inspected.
pub const NORMALIZE_ACK: Shape = Shape::Object(&[Field {
    name: "success",
    shape: Shape::Bool,
}]);

/// Reply shape for [`Flow::Normalize`] once the backend reported success.
///
/// `normalizedData` is itself a JSON document encoded as a string; the
/// caller parses and inspects it separately.
pub const NORMALIZE_REPLY: Shape = Shape::Object(&[
    Field {
        name: "success",
        shape: Shape::Bool,
    },
    Field {
        name: "normalizedData",
        shape: Shape::String,
    },
]);

/// One service entry inside a parse-scan reply.
const SCAN_SERVICE: Shape = Shape::Object(&[
    Field {
        name: "port",
        shape: Shape::Integer,
    },
    Field {
        name: "protocol",
        shape: Shape::String,
    },
    Field {
        name: "serviceName",
        shape: Shape::String,
    },
    Field {
        name: "serviceVersion",
        shape: Shape::String,
    },
    Field {
        name: "state",
        shape: Shape::String,
    },
]);

/// Reply shape for [`Flow::ParseScan`].
pub const PARSE_SCAN_REPLY: Shape = Shape::Object(&[
    Field {
        name: "services",
        shape: Shape::Array(&SCAN_SERVICE),
    },
    Field {
        name: "summary",
        shape: Shape::String,
    },
]);

/// Reply shape for [`Flow::Correlate`].
pub const CORRELATE_REPLY: Shape = Shape::Object(&[Field {
    name: "mappedVulnerabilities",
    shape: Shape::String,
}]);

/// Priority levels a patch recommendation may carry, in wire order.
pub const PRIORITY_LEVELS: &[&str] = &["Critical", "High", "Medium", "Low"];

/// One recommendation inside a prioritize reply.
const PATCH_RECOMMENDATION: Shape = Shape::Object(&[
    Field {
        name: "service",
        shape: Shape::String,
    },
    Field {
        name: "currentVersion",
        shape: Shape::String,
    },
    Field {
        name: "recommendedPatch",
        shape: Shape::String,
    },
    Field {
        name: "rationale",
        shape: Shape::String,
    },
    Field {
        name: "priority",
        shape: Shape::Enum(PRIORITY_LEVELS),
    },
]);

/// Reply shape for [`Flow::Prioritize`]. The reply is a bare array.
pub const PRIORITIZE_REPLY: Shape = Shape::Array(&PATCH_RECOMMENDATION);

/// Reply shape for [`Flow::Advise`].
pub const ADVISE_REPLY: Shape = Shape::Object(&[
    Field {
        name: "patchRecommendations",
        shape: Shape::String,
    },
    Field {
        name: "justification",
        shape: Shape::String,
    },
]);

/// Reply shape for [`Flow::Chat`].
pub const CHAT_REPLY: Shape = Shape::Object(&[Field {
    name: "response",
    shape: Shape::String,
}]);

/// Payload for [`Flow::Normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeRequest {
    /// Origin of the feed, e.g. `NVD` or a vendor advisory name.
    pub source: String,
    /// Raw feed text to normalize.
    pub data: String,
}

impl NormalizeRequest {
    /// Build a normalize payload.
    #[must_use]
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }
}

/// Payload for [`Flow::ParseScan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseScanRequest {
    /// Service scan XML document.
    pub xml_data: String,
}

impl ParseScanRequest {
    /// Build a parse-scan payload.
    #[must_use]
    pub fn new(xml_data: impl Into<String>) -> Self {
        Self {
            xml_data: xml_data.into(),
        }
    }
}

/// Payload for [`Flow::Correlate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelateRequest {
    /// Vulnerability data, typically a rendered summary of tracked records.
    pub vulnerability_data: String,
    /// Software and hardware inventory of the organization.
    pub asset_inventory_data: String,
}

impl CorrelateRequest {
    /// Build a correlate payload.
    #[must_use]
    pub fn new(
        vulnerability_data: impl Into<String>,
        asset_inventory_data: impl Into<String>,
    ) -> Self {
        Self {
            vulnerability_data: vulnerability_data.into(),
            asset_inventory_data: asset_inventory_data.into(),
        }
    }
}

/// Payload for [`Flow::Prioritize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizeRequest {
    /// Service scan XML the recommendations are derived from.
    pub nmap_scan_result: String,
}

impl PrioritizeRequest {
    /// Build a prioritize payload.
    #[must_use]
    pub fn new(nmap_scan_result: impl Into<String>) -> Self {
        Self {
            nmap_scan_result: nmap_scan_result.into(),
        }
    }
}

/// Payload for [`Flow::Advise`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviseRequest {
    /// Vulnerability analysis text, including identified issues and severity.
    pub vulnerability_analysis: String,
    /// Description of the assets and their importance to the organization.
    pub asset_criticality: String,
    /// Vendor advisories related to the vulnerabilities, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_advisories: Option<String>,
}

impl AdviseRequest {
    /// Build an advise payload without vendor advisories.
    #[must_use]
    pub fn new(
        vulnerability_analysis: impl Into<String>,
        asset_criticality: impl Into<String>,
    ) -> Self {
        Self {
            vulnerability_analysis: vulnerability_analysis.into(),
            asset_criticality: asset_criticality.into(),
            vendor_advisories: None,
        }
    }

    /// Attach vendor advisories to the payload.
    #[must_use]
    pub fn with_vendor_advisories(mut self, advisories: impl Into<String>) -> Self {
        self.vendor_advisories = Some(advisories.into());
        self
    }
}

/// Payload for [`Flow::Chat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Analyst question in plain language.
    pub query: String,
}

impl ChatRequest {
    /// Build a chat payload.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
