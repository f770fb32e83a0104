use std::sync::Arc;
use std::time::Duration;

use memoria_core::config::EmbeddingsConfig;
use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::Deadline;
use memoria_core::traits::IEmbedder;
use memoria_embeddings::EmbeddingEngine;

struct AlwaysFailingEmbedder {
    dims: usize,
}

impl IEmbedder for AlwaysFailingEmbedder {
    fn embed(&self, _text: &str, _deadline: Deadline) -> CortexResult<Vec<f32>> {
        Err(CortexError::Unavailable("primary down".into()))
    }

    fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t, deadline)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "always-failing"
    }
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(1))
}

#[test]
fn propagates_failure_by_default() {
    let primary: Arc<dyn IEmbedder> = Arc::new(AlwaysFailingEmbedder { dims: 64 });
    let engine = EmbeddingEngine::new(primary, &EmbeddingsConfig::default());

    let result = engine.embed("hello world", deadline());
    assert!(result.is_err());
}

#[test]
fn embed_resilient_falls_back_to_tfidf() {
    let primary: Arc<dyn IEmbedder> = Arc::new(AlwaysFailingEmbedder { dims: 64 });
    let engine = EmbeddingEngine::new(primary, &EmbeddingsConfig::default());

    let v = engine.embed_resilient("hello world", deadline()).unwrap();
    assert_eq!(v.len(), 64);
}

#[test]
fn repeated_resilient_calls_hit_the_cache() {
    let primary: Arc<dyn IEmbedder> = Arc::new(AlwaysFailingEmbedder { dims: 32 });
    let engine = EmbeddingEngine::new(primary, &EmbeddingsConfig::default());

    let a = engine.embed_resilient("cache me", deadline()).unwrap();
    let b = engine.embed_resilient("cache me", deadline()).unwrap();
    assert_eq!(a, b);
}
