use memoria_core::models::{Status, Tier};
use memoria_core::traits::IVectorIndex;
use memoria_vector::InMemoryVectorIndex;

#[test]
fn search_ranks_by_similarity_descending() {
    let index = InMemoryVectorIndex::new();
    index.ensure_schema(3).unwrap();
    index.upsert("u1", "a", &[1.0, 0.0, 0.0], Tier::Working, Status::Active).unwrap();
    index.upsert("u1", "b", &[0.0, 1.0, 0.0], Tier::Working, Status::Active).unwrap();
    index.upsert("u1", "c", &[0.9, 0.1, 0.0], Tier::Working, Status::Active).unwrap();

    let hits = index.search("u1", &[1.0, 0.0, 0.0], 2, None).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, "a");
    assert_eq!(hits[1].0, "c");
}

#[test]
fn search_is_scoped_per_user() {
    let index = InMemoryVectorIndex::new();
    index.upsert("u1", "a", &[1.0, 0.0], Tier::Working, Status::Active).unwrap();
    index.upsert("u2", "b", &[1.0, 0.0], Tier::Working, Status::Active).unwrap();

    let hits = index.search("u1", &[1.0, 0.0], 10, None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "a");
}

#[test]
fn delete_removes_point() {
    let index = InMemoryVectorIndex::new();
    index.upsert("u1", "a", &[1.0, 0.0], Tier::Working, Status::Active).unwrap();
    assert!(index.contains("u1", "a").unwrap());
    index.delete("u1", "a").unwrap();
    assert!(!index.contains("u1", "a").unwrap());
}

#[test]
fn scroll_pages_through_all_points() {
    let index = InMemoryVectorIndex::new();
    for i in 0..5 {
        index.upsert("u1", &format!("m{i}"), &[i as f32], Tier::Working, Status::Active).unwrap();
    }
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let (page, next) = index.scroll("u1", cursor.as_deref(), 2).unwrap();
        if page.is_empty() {
            break;
        }
        seen.extend(page);
        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }
    assert_eq!(seen.len(), 5);
}

#[test]
fn delete_by_filter_matches_tier_and_status_independently() {
    let index = InMemoryVectorIndex::new();
    index.upsert("u1", "working-active", &[1.0, 0.0], Tier::Working, Status::Active).unwrap();
    index.upsert("u1", "working-archived", &[1.0, 0.0], Tier::Working, Status::Archived).unwrap();
    index.upsert("u1", "history-active", &[1.0, 0.0], Tier::History, Status::Active).unwrap();

    let removed = index.delete_by_filter("u1", Some(Tier::Working), None).unwrap();
    assert_eq!(removed, 2);
    assert!(!index.contains("u1", "working-active").unwrap());
    assert!(!index.contains("u1", "working-archived").unwrap());
    assert!(index.contains("u1", "history-active").unwrap());
}

#[test]
fn delete_by_filter_with_no_filters_clears_the_user() {
    let index = InMemoryVectorIndex::new();
    index.upsert("u1", "a", &[1.0, 0.0], Tier::Working, Status::Active).unwrap();
    index.upsert("u1", "b", &[0.0, 1.0], Tier::History, Status::Archived).unwrap();

    let removed = index.delete_by_filter("u1", None, None).unwrap();
    assert_eq!(removed, 2);
}
