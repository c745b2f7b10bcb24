//! Canonical fixtures shared across test suites.
//!
//! The raw inputs imitate what an operator pastes in; the reply builders
//! produce backend replies already in the wire shape each flow declares.

use serde_json::{json, Value};

/// A raw vulnerability feed in NVD API form, as an operator would paste it.
pub const SAMPLE_FEED: &str = r#"{
  "resultsPerPage": 2,
  "format": "NVD_CVE",
  "vulnerabilities": [
    {
      "cve": {
        "id": "CVE-2023-48795",
        "descriptions": [
          { "lang": "en", "value": "The SSH transport protocol is vulnerable to a prefix truncation attack." }
        ],
        "metrics": { "cvssMetricV31": [ { "cvssData": { "baseSeverity": "HIGH" } } ] }
      }
    },
    {
      "cve": {
        "id": "CVE-2024-3094",
        "descriptions": [
          { "lang": "en", "value": "Malicious code was discovered in the upstream tarballs of xz." }
        ],
        "metrics": { "cvssMetricV31": [ { "cvssData": { "baseSeverity": "CRITICAL" } } ] }
      }
    }
  ]
}"#;

/// A service scan document in nmap XML output form.
pub const SAMPLE_SCAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -sV host" version="7.94">
  <host>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="open"/>
        <service name="ssh" product="OpenSSH" version="8.2p1"/>
      </port>
      <port protocol="tcp" portid="80">
        <state state="open"/>
        <service name="http" product="nginx" version="1.18.0"/>
      </port>
    </ports>
  </host>
</nmaprun>"#;

/// Canonical normalized feed items, one of them without a status.
#[must_use]
pub fn feed_items() -> Value {
    json!([
        {
            "id": "CVE-2023-48795",
            "severity": "High",
            "status": "New",
            "description": "SSH transport prefix truncation (Terrapin).",
        },
        {
            "id": "CVE-2024-3094",
            "severity": "Critical",
            "description": "Backdoored xz/liblzma release tarballs.",
        },
    ])
}

/// A successful normalize reply carrying `normalized` as its data string.
#[must_use]
pub fn normalize_success(normalized: &Value) -> Value {
    json!({
        "success": true,
        "message": "Data normalized successfully.",
        "normalizedData": normalized.to_string(),
    })
}

/// A normalize reply rejecting the feed with `message`.
#[must_use]
pub fn normalize_rejected(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

/// A parse-scan reply identifying the two services of [`SAMPLE_SCAN_XML`].
#[must_use]
pub fn scan_reply() -> Value {
    json!({
        "services": [
            {
                "port": 22,
                "protocol": "tcp",
                "serviceName": "ssh",
                "serviceVersion": "OpenSSH 8.2p1",
                "state": "open",
            },
            {
                "port": 80,
                "protocol": "tcp",
                "serviceName": "http",
                "serviceVersion": "nginx 1.18.0",
                "state": "open",
            },
        ],
        "summary": "Two services are listening: OpenSSH 8.2p1 on 22/tcp and nginx 1.18.0 on 80/tcp.",
    })
}

/// A prioritize reply recommending patches for both scanned services.
#[must_use]
pub fn prioritize_reply() -> Value {
    json!([
        {
            "service": "ssh",
            "currentVersion": "OpenSSH 8.2p1",
            "recommendedPatch": "OpenSSH 9.6p1",
            "rationale": "Resolves CVE-2023-48795 (Terrapin) and several auth bypass issues.",
            "priority": "High",
        },
        {
            "service": "http",
            "currentVersion": "nginx 1.18.0",
            "recommendedPatch": "nginx 1.24.0",
            "rationale": "Picks up the CVE-2023-44487 rapid reset mitigation.",
            "priority": "Medium",
        },
    ])
}

/// A correlate reply carrying `report` as the mapping text.
#[must_use]
pub fn correlate_reply(report: &str) -> Value {
    json!({ "mappedVulnerabilities": report })
}

/// An advise reply with recommendations and a justification.
#[must_use]
pub fn advise_reply() -> Value {
    json!({
        "patchRecommendations": "1. Upgrade OpenSSH to 9.6p1 on all bastion hosts.\n2. Upgrade nginx to 1.24.0 behind the load balancer.",
        "justification": "Both services face the internet and the SSH weakness is actively exploited.",
    })
}

/// A chat reply answering with `answer`.
#[must_use]
pub fn chat_reply(answer: &str) -> Value {
    json!({ "response": answer })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_feed_is_valid_json() {
        let parsed: Value = serde_json::from_str(SAMPLE_FEED).unwrap();
        assert_eq!(parsed["vulnerabilities"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn sample_scan_is_an_xml_document() {
        assert!(SAMPLE_SCAN_XML.starts_with("<?xml"));
        assert!(SAMPLE_SCAN_XML.contains("portid=\"22\""));
    }

    #[test]
    fn normalize_success_embeds_the_document_as_a_string() {
        let reply = normalize_success(&feed_items());
        assert_eq!(reply["success"], json!(true));
        let embedded: Value =
            serde_json::from_str(reply["normalizedData"].as_str().unwrap()).unwrap();
        assert_eq!(embedded, feed_items());
    }
}
