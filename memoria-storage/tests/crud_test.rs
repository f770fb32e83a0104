use chrono::Utc;
use memoria_core::models::{MemoryItem, Source, Tier};
use memoria_core::traits::IRecordStore;
use memoria_storage::StorageEngine;

fn user_item(user_id: &str, memory_id: &str) -> MemoryItem {
    MemoryItem::new(
        memory_id,
        user_id,
        Tier::Working,
        "the deploy window is Tuesdays at 2pm UTC",
        Source::User {
            conversation_id: "conv-1".to_string(),
            message_id: None,
        },
        Utc::now(),
    )
}

#[test]
fn put_then_get_roundtrips() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let item = user_item("u1", "m1");
    engine.put(&item).unwrap();

    let fetched = engine.get("u1", "m1").unwrap().expect("item exists");
    assert_eq!(fetched.text, item.text);
    assert_eq!(fetched.tier, Tier::Working);
    assert!(fetched.is_active());
}

#[test]
fn get_missing_returns_none() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.get("u1", "missing").unwrap().is_none());
}

#[test]
fn update_requires_existing_row() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let item = user_item("u1", "m1");
    assert!(engine.update(&item).is_err());
}

#[test]
fn delete_then_get_returns_none() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let item = user_item("u1", "m1");
    engine.put(&item).unwrap();
    engine.delete("u1", "m1").unwrap();
    assert!(engine.get("u1", "m1").unwrap().is_none());
}

#[test]
fn ghost_registry_is_orthogonal_to_status() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let item = user_item("u1", "m1");
    engine.put(&item).unwrap();

    assert!(!engine.is_ghost("u1", "m1").unwrap());
    engine.mark_ghost("u1", "m1").unwrap();
    assert!(engine.is_ghost("u1", "m1").unwrap());

    // Still retrievable by id and still "active" - ghosting never touches status.
    let fetched = engine.get("u1", "m1").unwrap().unwrap();
    assert!(fetched.is_active());

    engine.unmark_ghost("u1", "m1").unwrap();
    assert!(!engine.is_ghost("u1", "m1").unwrap());
}

#[test]
fn list_by_tier_filters_by_user_and_tier() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.put(&user_item("u1", "m1")).unwrap();
    engine.put(&user_item("u1", "m2")).unwrap();
    engine.put(&user_item("u2", "m3")).unwrap();

    let items = engine.list_by_tier("u1", Tier::Working, 10, 0).unwrap();
    assert_eq!(items.len(), 2);

    let counts = engine.count_by_tier("u1").unwrap();
    assert_eq!(counts, vec![(Tier::Working, 2)]);
}

#[test]
fn profile_roundtrips() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.get_profile("u1").unwrap().is_none());

    let profile = memoria_core::models::UserProfile {
        user_id: "u1".to_string(),
        goals: vec!["ship the migration".to_string()],
        values: vec!["move fast, don't break prod".to_string()],
        data: serde_json::json!({"team": "platform"}),
    };
    engine.put_profile(&profile).unwrap();

    let fetched = engine.get_profile("u1").unwrap().unwrap();
    assert_eq!(fetched.goals, profile.goals);
}

#[test]
fn checkpoint_roundtrips_then_clears() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let checkpoint = memoria_core::models::ReindexCheckpoint::new("job-1", Utc::now());
    engine.save_checkpoint(&checkpoint).unwrap();

    let loaded = engine.load_checkpoint("job-1").unwrap().unwrap();
    assert_eq!(loaded.job_id, "job-1");
    assert_eq!(loaded.processed, 0);

    engine.clear_checkpoint("job-1").unwrap();
    assert!(engine.load_checkpoint("job-1").unwrap().is_none());
}
