//! Pipeline behavior against a scripted capability backend.

use std::sync::Arc;

use patchwise_ai::{CapabilityError, Flow};
use patchwise_core::{
    FlowFailure, Mode, PatchDraft, PipelineError, Session, SessionConfig, Severity, Status,
};
use patchwise_test_utils::{fixtures, RecordedRequest, ScriptedCapability};
use serde_json::json;

fn live_session(backend: &Arc<ScriptedCapability>) -> Session {
    Session::new(backend.clone(), SessionConfig::new().with_mode(Mode::Live))
}

#[tokio::test]
async fn test_ingest_adds_normalized_items() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Normalize,
        fixtures::normalize_success(&fixtures::feed_items()),
    );
    let mut session = live_session(&backend);

    let report = session
        .ingest_feed("NVD", fixtures::SAMPLE_FEED)
        .await
        .unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.duplicates, 0);

    let records = session.vulnerabilities().records();
    assert_eq!(records[0].id, "CVE-2023-48795");
    assert_eq!(records[0].severity, Some(Severity::High));
    assert_eq!(records[0].status, Status::New);
    // The second item carried no status and must default to New.
    assert_eq!(records[1].status, Status::New);

    match &backend.requests()[0] {
        RecordedRequest::Normalize(request) => {
            assert_eq!(request.source, "NVD");
            assert_eq!(request.data, fixtures::SAMPLE_FEED);
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_reingesting_the_same_feed_is_idempotent() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Normalize,
        fixtures::normalize_success(&fixtures::feed_items()),
    );
    backend.enqueue(
        Flow::Normalize,
        fixtures::normalize_success(&fixtures::feed_items()),
    );
    let mut session = live_session(&backend);

    session
        .ingest_feed("NVD", fixtures::SAMPLE_FEED)
        .await
        .unwrap();
    let second = session
        .ingest_feed("NVD", fixtures::SAMPLE_FEED)
        .await
        .unwrap();

    assert_eq!(second.added, 0);
    assert_eq!(second.duplicates, 2);
    assert_eq!(session.vulnerabilities().len(), 2);
}

#[tokio::test]
async fn test_rejected_feed_surfaces_the_backend_message() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Normalize,
        fixtures::normalize_rejected("Unsupported feed format"),
    );
    let mut session = live_session(&backend);

    let err = session.ingest_feed("NVD", "...").await.unwrap_err();
    assert!(err.to_string().starts_with("feed ingestion failed"));
    match err {
        PipelineError::Ingest(FlowFailure::Rejected(message)) => {
            assert_eq!(message, "Unsupported feed format");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(session.vulnerabilities().is_empty());
}

#[tokio::test]
async fn test_malformed_normalize_reply_leaves_the_store_untouched() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::Normalize, json!({ "success": true }));
    let mut session = live_session(&backend);

    let err = session.ingest_feed("NVD", "...").await.unwrap_err();
    assert!(err.cause().is_schema());
    assert!(session.vulnerabilities().is_empty());
}

#[tokio::test]
async fn test_transport_failure_maps_to_the_ingest_variant() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue_error(
        Flow::Normalize,
        CapabilityError::Status {
            flow: Flow::Normalize.name(),
            status: 500,
        },
    );
    let mut session = live_session(&backend);

    let err = session.ingest_feed("NVD", "...").await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Ingest(FlowFailure::Capability(_))
    ));
}

#[tokio::test]
async fn test_scan_import_appends_assets() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::ParseScan, fixtures::scan_reply());
    backend.enqueue(Flow::ParseScan, fixtures::scan_reply());
    let mut session = live_session(&backend);

    let outcome = session
        .import_scan(fixtures::SAMPLE_SCAN_XML)
        .await
        .unwrap();
    assert_eq!(outcome.added, 2);
    assert!(outcome.summary.contains("OpenSSH"));
    assert_eq!(session.assets().records()[0].port, 22);

    // Repeated imports accumulate; nothing is merged.
    session
        .import_scan(fixtures::SAMPLE_SCAN_XML)
        .await
        .unwrap();
    assert_eq!(session.assets().len(), 4);
}

#[tokio::test]
async fn test_scan_import_rejects_an_unrecognized_state() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::ParseScan,
        json!({
            "services": [{
                "port": 22,
                "protocol": "tcp",
                "serviceName": "ssh",
                "serviceVersion": "OpenSSH 8.2p1",
                "state": "wide open",
            }],
            "summary": "one service",
        }),
    );
    let mut session = live_session(&backend);

    let err = session
        .import_scan(fixtures::SAMPLE_SCAN_XML)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::ScanImport(FlowFailure::Payload(_))
    ));
    assert!(session.assets().is_empty());
}

#[tokio::test]
async fn test_correlate_returns_the_mapping_report() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Correlate,
        fixtures::correlate_reply("CVE-2023-48795 affects the bastion host"),
    );
    let session = live_session(&backend);

    let report = session
        .correlate("tracked CVE list", "host inventory")
        .await
        .unwrap();
    assert_eq!(report, "CVE-2023-48795 affects the bastion host");

    match &backend.requests()[0] {
        RecordedRequest::Correlate(request) => {
            assert_eq!(request.vulnerability_data, "tracked CVE list");
            assert_eq!(request.asset_inventory_data, "host inventory");
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_prioritize_synthesizes_the_scan_description() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::ParseScan, fixtures::scan_reply());
    backend.enqueue(Flow::Prioritize, fixtures::prioritize_reply());
    let mut session = live_session(&backend);

    session
        .import_scan(fixtures::SAMPLE_SCAN_XML)
        .await
        .unwrap();
    let added = session.prioritize(None).await.unwrap();
    assert_eq!(added, 2);

    let patches = session.patches().records();
    assert_eq!(patches[0].service, "ssh");
    assert_eq!(patches[1].service, "http");
    assert_ne!(patches[0].id, patches[1].id);
    assert!(!patches[0].id.is_empty());

    match &backend.requests()[1] {
        RecordedRequest::Prioritize(request) => {
            assert!(request.nmap_scan_result.starts_with("<nmaprun>"));
            assert!(request
                .nmap_scan_result
                .contains("<port protocol=\"tcp\" portid=\"22\">"));
            assert!(request
                .nmap_scan_result
                .contains("<service name=\"http\" version=\"nginx 1.18.0\"/>"));
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_prioritize_with_an_explicit_description() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::Prioritize, json!([]));
    let mut session = live_session(&backend);

    let added = session.prioritize(Some("<nmaprun/>")).await.unwrap();
    assert_eq!(added, 0);

    match &backend.requests()[0] {
        RecordedRequest::Prioritize(request) => {
            assert_eq!(request.nmap_scan_result, "<nmaprun/>");
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_a_bad_priority_rejects_the_whole_batch() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Prioritize,
        json!([
            {
                "service": "ssh",
                "currentVersion": "8.2p1",
                "recommendedPatch": "9.6p1",
                "rationale": "terrapin",
                "priority": "High",
            },
            {
                "service": "http",
                "currentVersion": "1.18.0",
                "recommendedPatch": "1.24.0",
                "rationale": "rapid reset",
            },
        ]),
    );
    let mut session = live_session(&backend);
    session.create_patch(PatchDraft::new(
        "mysql",
        "5.7.33",
        "8.0.36",
        "end of life",
        Severity::Critical,
    ));

    let err = session.prioritize(Some("<nmaprun/>")).await.unwrap_err();
    assert!(err.to_string().starts_with("prioritization failed"));
    assert!(err.cause().is_schema());

    // Nothing from the rejected batch may land, the manual patch stays.
    assert_eq!(session.patches().len(), 1);
    assert_eq!(session.patches().records()[0].service, "mysql");
}

#[tokio::test]
async fn test_prioritize_ignores_ids_carried_by_the_reply() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(
        Flow::Prioritize,
        json!([
            {
                "id": "reply-supplied-1",
                "service": "ssh",
                "currentVersion": "8.2p1",
                "recommendedPatch": "9.6p1",
                "rationale": "terrapin",
                "priority": "High",
            },
            {
                "id": "reply-supplied-2",
                "service": "http",
                "currentVersion": "1.18.0",
                "recommendedPatch": "1.24.0",
                "rationale": "rapid reset",
                "priority": "Medium",
            },
        ]),
    );
    let mut session = live_session(&backend);

    let added = session.prioritize(Some("<nmaprun/>")).await.unwrap();
    assert_eq!(added, 2);

    // Bulk adds assign identity locally; an id carried by the reply never
    // becomes a store id.
    let patches = session.patches().records();
    assert!(!patches[0].id.is_empty());
    assert!(!patches[1].id.is_empty());
    assert_ne!(patches[0].id, patches[1].id);
    assert_ne!(patches[0].id, "reply-supplied-1");
    assert_ne!(patches[1].id, "reply-supplied-2");
}

#[tokio::test]
async fn test_advise_round_trip() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::Advise, fixtures::advise_reply());
    backend.enqueue(Flow::Advise, fixtures::advise_reply());
    let session = live_session(&backend);

    let advisory = session
        .advise("two high findings", "payment systems", None)
        .await
        .unwrap();
    assert!(advisory.patch_recommendations.contains("OpenSSH"));
    assert!(!advisory.justification.is_empty());

    session
        .advise("two high findings", "payment systems", Some("USN-6589-1"))
        .await
        .unwrap();

    let requests = backend.requests();
    match (&requests[0], &requests[1]) {
        (RecordedRequest::Advise(first), RecordedRequest::Advise(second)) => {
            assert_eq!(first.vendor_advisories, None);
            assert_eq!(second.vendor_advisories.as_deref(), Some("USN-6589-1"));
        }
        other => panic!("unexpected requests {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_answers_and_rejects_empty_replies() {
    let backend = Arc::new(ScriptedCapability::new());
    backend.enqueue(Flow::Chat, fixtures::chat_reply("Port 22 is exposed."));
    backend.enqueue(Flow::Chat, fixtures::chat_reply(""));
    let session = live_session(&backend);

    let answer = session.chat("what is exposed?").await.unwrap();
    assert_eq!(answer, "Port 22 is exposed.");

    let err = session.chat("and now?").await.unwrap_err();
    assert!(matches!(err, PipelineError::Chat(FlowFailure::Malformed(_))));
}
