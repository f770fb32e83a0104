pub mod http_embedder;
pub mod http_reranker;
pub mod http_summarizer;
pub mod tfidf_fallback;

pub use http_embedder::HttpEmbedder;
pub use http_reranker::HttpReranker;
pub use http_summarizer::HttpSummarizer;
pub use tfidf_fallback::TfIdfFallback;
