use crate::errors::CortexResult;
use crate::models::Deadline;

/// Embedding generation provider (§4.2). Every call is deadline-bounded so a
/// slow remote embedder degrades the caller instead of hanging it.
pub trait IEmbedder: Send + Sync {
    fn embed(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>>;
    fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>>;

    fn dimensions(&self) -> usize;
    fn model_name(&self) -> &str;
}

/// Cross-encoder reranker provider (§4.5 stage 7).
pub trait IReranker: Send + Sync {
    /// Score `query` against each of `candidates`, returning one score per
    /// candidate in input order.
    fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        deadline: Deadline,
    ) -> CortexResult<Vec<f64>>;

    fn model_name(&self) -> &str;
}

/// Abstractive summarizer used for long-text compaction (§4.3).
pub trait ISummarizer: Send + Sync {
    fn summarize(&self, text: &str, max_chars: usize, deadline: Deadline) -> CortexResult<String>;
}
