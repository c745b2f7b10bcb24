//! Fixed demonstration dataset.
//!
//! Everything here is constant: the aggregate shown on the dashboard while
//! in Demo mode, and the rows seeded into the stores when the mode is
//! switched on. None of it is ever persisted.

use std::collections::BTreeMap;

use serde_json::json;

use crate::dashboard::{DashboardSummary, SeveritySlice};
use crate::model::{Asset, Patch, PortState, Severity, Status, Vulnerability};

/// Constant dashboard aggregate shown in Demo mode.
#[must_use]
pub fn summary() -> DashboardSummary {
    DashboardSummary {
        total_vulnerabilities: 1234,
        critical_issues: 89,
        patches_applied: 573,
        assets_monitored: 2450,
        vulnerability_chart_data: vec![
            SeveritySlice {
                severity: Severity::Low,
                count: 186,
            },
            SeveritySlice {
                severity: Severity::Medium,
                count: 305,
            },
            SeveritySlice {
                severity: Severity::High,
                count: 237,
            },
            SeveritySlice {
                severity: Severity::Critical,
                count: 89,
            },
        ],
    }
}

/// Vulnerability rows seeded when Demo mode is switched on.
#[must_use]
pub fn vulnerabilities() -> Vec<Vulnerability> {
    vec![
        Vulnerability {
            id: "CVE-2024-3094".to_string(),
            severity: Some(Severity::Critical),
            status: Status::Investigating,
            extra: detail(
                "Malicious code in upstream xz/liblzma tarballs enables remote access \
                 through sshd.",
                "xz-utils 5.6.0",
            ),
        },
        Vulnerability {
            id: "CVE-2023-48795".to_string(),
            severity: Some(Severity::High),
            status: Status::New,
            extra: detail(
                "Terrapin attack: SSH transport prefix truncation weakens channel \
                 integrity.",
                "OpenSSH 8.2p1",
            ),
        },
        Vulnerability {
            id: "CVE-2021-44228".to_string(),
            severity: Some(Severity::Critical),
            status: Status::Patched,
            extra: detail(
                "Log4Shell: JNDI lookup in log4j allows remote code execution via \
                 crafted log messages.",
                "log4j 2.14.1",
            ),
        },
        Vulnerability {
            id: "CVE-2023-44487".to_string(),
            severity: Some(Severity::Medium),
            status: Status::New,
            extra: detail(
                "HTTP/2 rapid reset allows request floods well beyond configured \
                 stream limits.",
                "nginx 1.18.0",
            ),
        },
        Vulnerability {
            id: "CVE-2019-0190".to_string(),
            severity: Some(Severity::Low),
            status: Status::FalsePositive,
            extra: detail(
                "mod_ssl renegotiation denial of service; scanner matched a build \
                 with the fix backported.",
                "Apache httpd 2.4.41",
            ),
        },
    ]
}

/// Asset rows seeded when Demo mode is switched on.
#[must_use]
pub fn assets() -> Vec<Asset> {
    vec![
        Asset::new(22, "tcp", "ssh", "OpenSSH 8.2p1", PortState::Open),
        Asset::new(80, "tcp", "http", "nginx 1.18.0", PortState::Open),
        Asset::new(443, "tcp", "https", "Apache httpd 2.4.41", PortState::Open),
        Asset::new(3306, "tcp", "mysql", "MySQL 5.7.33", PortState::Open),
    ]
}

/// Patch rows seeded when Demo mode is switched on.
#[must_use]
pub fn patches() -> Vec<Patch> {
    vec![
        Patch {
            id: "demo-patch-1".to_string(),
            service: "ssh".to_string(),
            current_version: "OpenSSH 8.2p1".to_string(),
            recommended_patch: "OpenSSH 9.6p1".to_string(),
            rationale: "Resolves the Terrapin prefix truncation weakness \
                        (CVE-2023-48795)."
                .to_string(),
            priority: Severity::High,
        },
        Patch {
            id: "demo-patch-2".to_string(),
            service: "http".to_string(),
            current_version: "nginx 1.18.0".to_string(),
            recommended_patch: "nginx 1.24.0".to_string(),
            rationale: "Picks up the HTTP/2 rapid reset mitigation (CVE-2023-44487)."
                .to_string(),
            priority: Severity::Medium,
        },
        Patch {
            id: "demo-patch-3".to_string(),
            service: "mysql".to_string(),
            current_version: "MySQL 5.7.33".to_string(),
            recommended_patch: "MySQL 8.0.36".to_string(),
            rationale: "5.7 is past end of life and no longer receives security fixes."
                .to_string(),
            priority: Severity::Critical,
        },
    ]
}

fn detail(description: &str, affected: &str) -> BTreeMap<String, serde_json::Value> {
    BTreeMap::from([
        ("description".to_string(), json!(description)),
        ("affected".to_string(), json!(affected)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_carries_the_fixed_aggregate() {
        let summary = summary();
        assert_eq!(summary.total_vulnerabilities, 1234);
        assert_eq!(summary.critical_issues, 89);
        assert_eq!(summary.patches_applied, 573);
        assert_eq!(summary.assets_monitored, 2450);

        let counts: Vec<usize> = summary
            .vulnerability_chart_data
            .iter()
            .map(|slice| slice.count)
            .collect();
        assert_eq!(counts, [186, 305, 237, 89]);
    }

    #[test]
    fn summary_chart_follows_severity_order() {
        let order: Vec<Severity> = summary()
            .vulnerability_chart_data
            .iter()
            .map(|slice| slice.severity)
            .collect();
        assert_eq!(order, Severity::ALL);
    }

    #[test]
    fn seeded_vulnerabilities_have_distinct_ids() {
        let rows = vulnerabilities();
        let mut ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rows.len());
    }

    #[test]
    fn seeded_rows_cover_every_status() {
        let rows = vulnerabilities();
        for status in Status::ALL {
            assert!(
                rows.iter().any(|row| row.status == status),
                "no seeded row with status {status}"
            );
        }
    }

    #[test]
    fn seeded_patches_use_stable_identifiers() {
        let ids: Vec<String> = patches().into_iter().map(|patch| patch.id).collect();
        assert_eq!(ids, ["demo-patch-1", "demo-patch-2", "demo-patch-3"]);
    }
}
