use memoria_core::traits::ILexicalIndex;
use memoria_lexical::BmInMemoryIndex;

#[test]
fn scores_rank_by_term_overlap() {
    let index = BmInMemoryIndex::new();
    index
        .index("u1", "a", "retry policy for downstream timeouts")
        .unwrap();
    index.index("u1", "b", "cooking pasta recipes").unwrap();

    let hits = index.score("u1", "retry policy", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "a");
}

#[test]
fn empty_query_yields_no_hits() {
    let index = BmInMemoryIndex::new();
    index.index("u1", "a", "some content here").unwrap();
    let hits = index.score("u1", "???", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn unknown_user_yields_no_hits() {
    let index = BmInMemoryIndex::new();
    let hits = index.score("ghost", "anything", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn remove_drops_document_from_future_scores() {
    let index = BmInMemoryIndex::new();
    index.index("u1", "a", "retry policy timeout").unwrap();
    index.remove("u1", "a").unwrap();
    let hits = index.score("u1", "retry policy", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn invalidate_user_clears_all_documents() {
    let index = BmInMemoryIndex::new();
    index.index("u1", "a", "retry policy timeout").unwrap();
    index.index("u1", "b", "retry policy backoff").unwrap();
    index.invalidate_user("u1").unwrap();
    let hits = index.score("u1", "retry policy", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn rarer_term_contributes_more_weight() {
    let index = BmInMemoryIndex::new();
    index.index("u1", "a", "common common common rare").unwrap();
    index.index("u1", "b", "common common common").unwrap();
    index.index("u1", "c", "common rare rare rare").unwrap();

    let hits = index.score("u1", "rare", 10).unwrap();
    assert_eq!(hits[0].0, "c");
}
