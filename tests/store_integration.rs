//! Store behaviour against the real file sink.

use lexigrove::storage::{load_state, FileSink};
use lexigrove_core::backup::IdPolicy;
use lexigrove_core::clock::ManualClock;
use lexigrove_core::models::{AppState, ProfilePatch, WordStatus, DAY_MS};
use lexigrove_core::{LearningStore, StoreOptions};
use tempfile::TempDir;

// 2024-03-10T12:00:00Z
const NOON: i64 = 1_710_072_000_000;

fn file_store(dir: &TempDir, clock: &ManualClock, policy: IdPolicy) -> LearningStore {
    let path = dir.path().join("state.json");
    let state = load_state(&path).unwrap();
    LearningStore::new(
        state,
        Box::new(FileSink::new(path)),
        Box::new(clock.clone()),
        StoreOptions {
            id_policy: policy,
            ..Default::default()
        },
    )
}

#[test]
fn test_every_mutation_reaches_disk() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(NOON);
    let mut store = file_store(&dir, &clock, IdPolicy::Winner);

    let id = store.add_word("resilient").unwrap().unwrap();
    clock.advance(1_000);
    store.update_word_status(&id, WordStatus::Mastered).unwrap();
    store
        .update_profile(ProfilePatch::single("dream", "run a café").unwrap())
        .unwrap();

    let reopened = file_store(&dir, &clock, IdPolicy::Winner);
    assert_eq!(reopened.state(), store.state());
    let word = reopened.find_word("Resilient").unwrap();
    assert_eq!(word.mastered_at, Some(NOON + 1_000));
    assert_eq!(reopened.profile().dream, "run a café");
}

#[test]
fn test_growth_survives_restart() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(NOON);
    {
        let mut store = file_store(&dir, &clock, IdPolicy::Winner);
        store.check_daily_growth().unwrap();
    }
    clock.advance_days(1);
    let mut store = file_store(&dir, &clock, IdPolicy::Winner);
    store.check_daily_growth().unwrap();
    assert_eq!(store.growth().current_stage, 2);
    assert_eq!(store.growth().last_activity_date, NOON + DAY_MS);
}

#[test]
fn test_import_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(NOON);
    let mut source = file_store(&dir, &clock, IdPolicy::Winner);
    source.add_words_bulk(&["cat", "dog"]).unwrap();
    let id = source.find_word("cat").unwrap().id.clone();
    source.update_word_status(&id, WordStatus::Review).unwrap();
    let backup = source.export_data().unwrap();

    let other = TempDir::new().unwrap();
    let mut target = file_store(&other, &clock, IdPolicy::Winner);
    target.add_word("Dog").unwrap();

    assert!(target.import_data(&backup).unwrap().success);
    let once: AppState = load_state(&other.path().join("state.json")).unwrap();
    assert!(target.import_data(&backup).unwrap().success);
    let twice: AppState = load_state(&other.path().join("state.json")).unwrap();

    assert_eq!(once.words, twice.words);
    assert_eq!(twice.words.len(), 2);
    assert_eq!(twice.words[0].word.to_lowercase(), "dog");
    assert_eq!(twice.words[1].word, "cat");
}

#[test]
fn test_import_tie_under_both_id_policies() {
    let backup = r#"{"version":1,"words":[
        {"id":"remote-id","word":"owl","status":"learning","addedAt":5,"learningCount":7}
    ]}"#;

    for policy in [IdPolicy::Winner, IdPolicy::Local] {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(NOON);
        let mut store = file_store(&dir, &clock, policy);
        let local_id = store.add_word("Owl").unwrap().unwrap();
        store
            .update_word_status(&local_id, WordStatus::Learning)
            .unwrap();

        store.import_data(backup).unwrap();
        let word = &store.words()[0];
        assert_eq!(store.words().len(), 1);
        let expected_id = match policy {
            IdPolicy::Winner => "remote-id".to_string(),
            IdPolicy::Local => local_id.clone(),
        };
        assert_eq!(word.id, expected_id);
        assert_eq!(word.learning_count, 7);
    }
}

#[test]
fn test_rejected_import_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(NOON);
    let mut store = file_store(&dir, &clock, IdPolicy::Winner);
    store.add_word("keep").unwrap();
    let path = dir.path().join("state.json");
    let before = std::fs::read_to_string(&path).unwrap();

    let outcome = store.import_data(r#"{"profile":{}}"#).unwrap();
    assert!(!outcome.success);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}
