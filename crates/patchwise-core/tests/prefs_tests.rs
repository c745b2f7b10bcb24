//! Preference persistence across sessions.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use patchwise_core::{Mode, Session, SessionConfig};
use patchwise_test_utils::ScriptedCapability;

fn session_at(path: &PathBuf) -> Session {
    Session::new(
        Arc::new(ScriptedCapability::new()),
        SessionConfig::new().with_prefs_path(path.clone()),
    )
}

#[test]
fn test_login_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut session = Session::new(
        Arc::new(ScriptedCapability::new()),
        SessionConfig::new()
            .with_mode(Mode::Live)
            .with_prefs_path(path.clone()),
    );
    assert!(session.login("admin", "admin").unwrap());
    drop(session);

    let revived = session_at(&path);
    assert!(revived.is_authenticated());
    // The explicit Live mode was persisted along with the login.
    assert_eq!(revived.mode(), Mode::Live);
}

#[test]
fn test_logout_removes_the_auth_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut session = session_at(&path);
    session.login("admin", "admin").unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("patchwise_auth"));

    session.logout().unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("patchwise_auth"));
    assert!(raw.contains("patchwise_demo_mode"));

    let revived = session_at(&path);
    assert!(!revived.is_authenticated());
}

#[test]
fn test_mode_switch_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut session = session_at(&path);
    assert_eq!(session.mode(), Mode::Demo);
    session.set_mode(Mode::Live).unwrap();
    drop(session);

    let revived = session_at(&path);
    assert_eq!(revived.mode(), Mode::Live);
    assert!(revived.vulnerabilities().is_empty());
}

#[test]
fn test_failed_login_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut session = session_at(&path);
    assert!(!session.login("root", "toor").unwrap());
    // No successful login, no mode switch, nothing written yet.
    assert!(!path.exists());
}

#[test]
fn test_a_corrupt_preference_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let session = session_at(&path);
    assert_eq!(session.mode(), Mode::Demo);
    assert!(!session.is_authenticated());
}

#[test]
fn test_an_absent_file_means_demo_and_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never-written.json");

    let session = session_at(&path);
    assert_eq!(session.mode(), Mode::Demo);
    assert!(!session.is_authenticated());
    assert!(!path.exists());
}
