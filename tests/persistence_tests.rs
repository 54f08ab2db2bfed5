//! Persistence integration tests.
//!
//! These tests reopen machines over the same `FileStore` directory to check
//! that sessions and history survive a restart, and that damaged records
//! degrade to defaults instead of failing.

use ember_cards::cards::CardId;
use ember_cards::core::{GameState, Players, SessionConfig, Status, VisualTheme};
use ember_cards::deck::StaticDeckProvider;
use ember_cards::session::SessionMachine;
use ember_cards::storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn open(dir: &TempDir) -> SessionMachine<FileStore> {
    let store = FileStore::open(dir.path()).unwrap();
    SessionMachine::open(store, SessionConfig::default())
}

fn start(machine: &mut SessionMachine<FileStore>, theme: &str) {
    let provider = StaticDeckProvider::builtin();
    block_on(machine.start(&provider, "Ava", "Ben", theme, VisualTheme::Ocean)).unwrap();
}

/// Test that a playing session resumes exactly where it stopped.
#[test]
fn test_playing_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    let before = {
        let mut machine = open(&temp_dir);
        start(&mut machine, "Deep Connections");
        machine.advance_turn();
        machine.advance_turn();
        machine.toggle_impactful(&CardId::new("deep-2"));
        machine.state().clone()
    };

    let mut machine = open(&temp_dir);
    assert_eq!(machine.state(), &before);
    assert_eq!(machine.state().current_card().unwrap().id, CardId::new("deep-3"));
    assert!(machine.state().is_impactful(&CardId::new("deep-2")));

    // Play continues from the restored deck
    assert!(machine.advance_turn());
    assert_eq!(machine.state().current_card().unwrap().id, CardId::new("deep-4"));
}

/// Test that history survives restart and new stamps stay unique.
#[test]
fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    let first = {
        let mut machine = open(&temp_dir);
        start(&mut machine, "Hard Truths");
        let record = machine.finish().unwrap();
        machine.reset();
        record
    };

    let mut machine = open(&temp_dir);
    assert_eq!(machine.history().len(), 1);
    assert_eq!(machine.review(&first.id), Some(&first));

    start(&mut machine, "Future & Dreams");
    let second = machine.finish().unwrap();
    assert!(second.id.parse::<i64>().unwrap() > first.id.parse::<i64>().unwrap());

    let ids: Vec<_> = machine.history().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

/// Test that a setup state leaves no session record behind.
#[test]
fn test_setup_leaves_no_session_record() {
    let temp_dir = TempDir::new().unwrap();
    let mut machine = open(&temp_dir);

    assert!(!temp_dir.path().join("ember_active_session.json").exists());

    start(&mut machine, "Deep Connections");
    assert!(temp_dir.path().join("ember_active_session.json").exists());

    machine.reset();
    assert!(!temp_dir.path().join("ember_active_session.json").exists());

    // Setup is not persisted, so a reopen starts from defaults
    let machine = open(&temp_dir);
    assert_eq!(machine.state(), &GameState::default());
}

/// Test that a finished session is restored as finished.
#[test]
fn test_finished_session_is_restored() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut machine = open(&temp_dir);
        start(&mut machine, "Playful & Random");
        machine.finish();
    }

    let mut machine = open(&temp_dir);
    assert_eq!(machine.state().status(), Status::Finished);
    assert_eq!(machine.state().drawn_cards().unwrap().len(), 1);

    // The restored session cannot be archived again
    assert!(machine.finish().is_none());
    assert_eq!(machine.history().len(), 1);
}

/// Test that corrupt records fall back to defaults.
#[test]
fn test_corrupt_records_fall_back() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("ember_active_session.json"), "{\"status\":").unwrap();
    std::fs::write(temp_dir.path().join("ember_journey_history.json"), "not json").unwrap();

    let mut machine = open(&temp_dir);
    assert_eq!(machine.state(), &GameState::default());
    assert!(machine.history().is_empty());

    // The machine stays usable and overwrites the damaged records
    start(&mut machine, "Hard Truths");
    machine.finish();
    let raw = machine.store().get("ember_journey_history").unwrap().unwrap();
    assert!(raw.starts_with('['));
}

/// Test that a session saved mid-load comes back as setup and the stale
/// record is cleared.
#[test]
fn test_loading_record_reverts_to_setup() {
    let temp_dir = TempDir::new().unwrap();
    let loading = r#"{
        "players": ["Ava", "Ben"],
        "activePlayerIndex": 0,
        "impactfulCardIds": [],
        "theme": "Hard Truths",
        "visualTheme": "Forest",
        "status": "loading",
        "request": 7
    }"#;
    std::fs::write(temp_dir.path().join("ember_active_session.json"), loading).unwrap();

    let machine = open(&temp_dir);
    assert_eq!(machine.state().status(), Status::Setup);
    assert_eq!(machine.state().players, Players::new("Ava", "Ben"));
    assert_eq!(machine.state().visual_theme, VisualTheme::Forest);
    assert!(!temp_dir.path().join("ember_active_session.json").exists());
}

/// Test that custom keys and limits are honoured.
#[test]
fn test_custom_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = SessionConfig::new()
        .with_keys("live", "archive")
        .with_history_limit(2);
    let store = FileStore::open(temp_dir.path()).unwrap();
    let mut machine = SessionMachine::open(store, config);

    for _ in 0..3 {
        start(&mut machine, "Deep Connections");
        machine.finish();
        machine.reset();
    }
    start(&mut machine, "Deep Connections");

    assert_eq!(machine.history().len(), 2);
    assert!(temp_dir.path().join("live.json").exists());
    assert!(temp_dir.path().join("archive.json").exists());
    assert!(!temp_dir.path().join("ember_active_session.json").exists());
}

/// Test that impactful marks for cards never shown are dropped on reopen.
#[test]
fn test_unshown_impactful_marks_dropped() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut machine = open(&temp_dir);
        start(&mut machine, "Deep Connections");
        machine.advance_turn();
        machine.toggle_impactful(&CardId::new("deep-1"));
    }

    let path = temp_dir.path().join("ember_active_session.json");
    let mut record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    record["impactfulCardIds"] = serde_json::json!(["bogus", "deep-1", "deep-7"]);
    std::fs::write(&path, record.to_string()).unwrap();

    let mut machine = open(&temp_dir);
    let marked: Vec<_> = machine.state().impactful.iter().cloned().collect();
    assert_eq!(marked, vec![CardId::new("deep-1")]);

    // deep-7 arrives unmarked and a single toggle marks it
    for _ in 0..5 {
        machine.advance_turn();
    }
    assert_eq!(machine.state().current_card().unwrap().id, CardId::new("deep-7"));
    assert!(!machine.state().is_impactful(&CardId::new("deep-7")));
    assert!(machine.toggle_impactful(&CardId::new("deep-7")));
    assert!(machine.state().is_impactful(&CardId::new("deep-7")));
}
