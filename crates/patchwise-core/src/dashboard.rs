//! Dashboard aggregation over the three stores.
//!
//! Pure read-side computation: every call recomputes from the stores, and
//! the result holds no independent state. Store sizes are bounded by one
//! operator session, so the O(n) walk per read needs no caching.

use serde::{Deserialize, Serialize};

use crate::model::Severity;
use crate::store::{AssetStore, PatchStore, VulnerabilityStore};

/// One slice of the severity histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySlice {
    /// Severity level the slice counts
    pub severity: Severity,
    /// Number of records at that level
    pub count: usize,
}

/// Derived dashboard view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Total tracked vulnerability records
    pub total_vulnerabilities: usize,
    /// Records with severity Critical
    pub critical_issues: usize,
    /// Patch recommendations on file
    pub patches_applied: usize,
    /// Services in the asset inventory
    pub assets_monitored: usize,
    /// Histogram over the four severity levels, in fixed chart order
    pub vulnerability_chart_data: Vec<SeveritySlice>,
}

/// Compute the live aggregate from the three stores.
///
/// The histogram covers all four levels in the order
/// `[Low, Medium, High, Critical]`, zero-filled. Records without a
/// recognized severity count toward the total but appear in no slice.
#[must_use]
pub fn aggregate(
    vulnerabilities: &VulnerabilityStore,
    assets: &AssetStore,
    patches: &PatchStore,
) -> DashboardSummary {
    let chart: Vec<SeveritySlice> = Severity::ALL
        .iter()
        .map(|&severity| SeveritySlice {
            severity,
            count: vulnerabilities
                .records()
                .iter()
                .filter(|record| record.severity == Some(severity))
                .count(),
        })
        .collect();

    let critical_issues = chart
        .iter()
        .find(|slice| slice.severity == Severity::Critical)
        .map_or(0, |slice| slice.count);

    DashboardSummary {
        total_vulnerabilities: vulnerabilities.len(),
        critical_issues,
        patches_applied: patches.len(),
        assets_monitored: assets.len(),
        vulnerability_chart_data: chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatchDraft, Severity, VulnerabilityDraft};
    use serde_json::json;

    fn store_with(severities: &[Option<Severity>]) -> VulnerabilityStore {
        let mut store = VulnerabilityStore::new();
        store.add_all(
            severities
                .iter()
                .map(|severity| {
                    let draft = VulnerabilityDraft::new();
                    match severity {
                        Some(s) => draft.with_severity(*s),
                        None => draft,
                    }
                })
                .collect(),
        );
        store
    }

    #[test]
    fn empty_stores_yield_a_zero_filled_chart() {
        let summary = aggregate(
            &VulnerabilityStore::new(),
            &AssetStore::new(),
            &PatchStore::new(),
        );

        assert_eq!(summary.total_vulnerabilities, 0);
        assert_eq!(summary.critical_issues, 0);
        assert_eq!(summary.vulnerability_chart_data.len(), 4);
        assert!(summary
            .vulnerability_chart_data
            .iter()
            .all(|slice| slice.count == 0));
    }

    #[test]
    fn chart_follows_fixed_severity_order() {
        let summary = aggregate(
            &VulnerabilityStore::new(),
            &AssetStore::new(),
            &PatchStore::new(),
        );
        let order: Vec<Severity> = summary
            .vulnerability_chart_data
            .iter()
            .map(|slice| slice.severity)
            .collect();
        assert_eq!(order, Severity::ALL);
    }

    #[test]
    fn critical_high_critical_scenario() {
        let vulnerabilities = store_with(&[
            Some(Severity::Critical),
            Some(Severity::High),
            Some(Severity::Critical),
        ]);
        let summary = aggregate(&vulnerabilities, &AssetStore::new(), &PatchStore::new());

        assert_eq!(summary.total_vulnerabilities, 3);
        assert_eq!(summary.critical_issues, 2);

        let counts: Vec<usize> = summary
            .vulnerability_chart_data
            .iter()
            .map(|slice| slice.count)
            .collect();
        assert_eq!(counts, [0, 0, 1, 2]);
    }

    #[test]
    fn unrecognized_severity_counts_toward_total_only() {
        let vulnerabilities = store_with(&[Some(Severity::Low), None]);
        let summary = aggregate(&vulnerabilities, &AssetStore::new(), &PatchStore::new());

        assert_eq!(summary.total_vulnerabilities, 2);
        let slice_total: usize = summary
            .vulnerability_chart_data
            .iter()
            .map(|slice| slice.count)
            .sum();
        assert_eq!(slice_total, 1);
    }

    #[test]
    fn patch_and_asset_counters_come_from_their_stores() {
        let mut patches = PatchStore::new();
        patches.create(PatchDraft::new(
            "openssh",
            "8.2p1",
            "9.6p1",
            "addresses CVE-2023-48795",
            Severity::High,
        ));
        let mut assets = AssetStore::new();
        assets.add_all(vec![crate::model::Asset::new(
            22,
            "tcp",
            "ssh",
            "OpenSSH 8.2p1",
            crate::model::PortState::Open,
        )]);

        let summary = aggregate(&VulnerabilityStore::new(), &assets, &patches);
        assert_eq!(summary.patches_applied, 1);
        assert_eq!(summary.assets_monitored, 1);
    }

    #[test]
    fn summary_serializes_with_wire_casing() {
        let summary = aggregate(
            &VulnerabilityStore::new(),
            &AssetStore::new(),
            &PatchStore::new(),
        );
        let wire = serde_json::to_value(&summary).unwrap();
        assert_eq!(wire["totalVulnerabilities"], json!(0));
        assert_eq!(wire["vulnerabilityChartData"][0]["severity"], json!("Low"));
    }
}
