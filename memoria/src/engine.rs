//! `MemoriaEngine` — owns every subsystem engine and wires them together
//! (§6). Modeled on the Facade pattern used elsewhere in the ecosystem: one
//! struct, constructed once by the caller, with `Arc`-shared storage/vector
//! index/embedder handed to each subsystem that needs it. Unlike an
//! FFI-exposed runtime this is a plain library type — no global singleton,
//! no binding-layer error conversion; callers own the `Arc<MemoriaEngine>`.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;

use memoria_core::config::EngineConfig;
use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::traits::{IEmbedder, ILexicalIndex, IReranker, ISummarizer, IVectorIndex};
use memoria_embeddings::providers::{HttpEmbedder, HttpReranker, HttpSummarizer};
use memoria_embeddings::{EmbeddingEngine, RerankEngine, SummarizerEngine};
use memoria_lexical::BmInMemoryIndex;
use memoria_lifecycle::{ItemLocks, OutcomeRecorder, Promoter};
use memoria_consistency::{ConsistencyChecker, Reindexer};
use memoria_retrieval::RetrievalPipeline;
use memoria_storage::StorageEngine;
use memoria_vector::InMemoryVectorIndex;
use memoria_assembler::ContextAssembler;

use crate::config::MemoriaOptions;

/// Everything the Facade operations in `crate::ops` need. Every field is
/// `pub(crate)` rather than private: the operation modules are thin
/// extensions of this struct, split out by concern the way the teacher
/// splits NAPI bindings by concern rather than by putting every method on
/// one giant `impl` block.
pub struct MemoriaEngine {
    pub(crate) store: Arc<StorageEngine>,
    pub(crate) vector_index: Arc<InMemoryVectorIndex>,
    pub(crate) lexical_index: Arc<BmInMemoryIndex>,
    pub(crate) embedder: Arc<EmbeddingEngine>,
    pub(crate) retrieval: RetrievalPipeline,
    pub(crate) summarizer: Arc<dyn ISummarizer>,
    pub(crate) locks: Arc<ItemLocks>,
    pub(crate) outcome_recorder: OutcomeRecorder,
    pub(crate) promoter: Promoter,
    pub(crate) consistency_checker: ConsistencyChecker,
    pub(crate) reindexer: Reindexer,
    pub(crate) assembler: ContextAssembler,
    pub(crate) config: EngineConfig,
    /// Per-user message counters driving the §4.8 trigger hook.
    pub(crate) message_counts: DashMap<String, u64>,
}

impl MemoriaEngine {
    pub fn new(opts: MemoriaOptions) -> CortexResult<Self> {
        Self::build(opts)
    }

    /// Convenience constructor for tests and embedders that only need an
    /// in-memory store with every other knob left at its default.
    pub fn in_memory() -> CortexResult<Self> {
        Self::build(MemoriaOptions::default())
    }

    fn build(opts: MemoriaOptions) -> CortexResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => EngineConfig::from_toml(toml_str)?,
            None => EngineConfig::default(),
        };

        let store = Arc::new(match &opts.db_path {
            Some(path) => StorageEngine::open(Path::new(path), &config.storage)?,
            None => StorageEngine::open_in_memory()?,
        });

        let vector_index = Arc::new(InMemoryVectorIndex::new());
        vector_index.ensure_schema(opts.providers.embedder_dimensions)?;
        let lexical_index = Arc::new(BmInMemoryIndex::new());

        let primary_embedder: Arc<dyn IEmbedder> = Arc::new(HttpEmbedder::new(
            opts.providers.embedder_endpoint.clone(),
            opts.providers.embedder_model.clone(),
            opts.providers.embedder_dimensions,
        ));
        let embedder = Arc::new(EmbeddingEngine::new(primary_embedder, &config.embeddings));

        let reranker: Arc<dyn IReranker> = Arc::new(RerankEngine::new(
            HttpReranker::new(
                opts.providers.reranker_endpoint.clone(),
                opts.providers.reranker_model.clone(),
                opts.providers.reranker_max_batch_size,
            ),
            &config.embeddings,
        ));
        let summarizer: Arc<dyn ISummarizer> = Arc::new(SummarizerEngine::new(
            HttpSummarizer::new(opts.providers.summarizer_endpoint.clone()),
            &config.embeddings,
        ));

        let retrieval = RetrievalPipeline::new(
            store.clone(),
            vector_index.clone() as Arc<dyn IVectorIndex>,
            lexical_index.clone() as Arc<dyn ILexicalIndex>,
            embedder.clone() as Arc<dyn IEmbedder>,
            reranker,
            config.retrieval.clone(),
            config.timeouts.clone(),
        );

        let locks = Arc::new(ItemLocks::new());
        let outcome_recorder = OutcomeRecorder::new(store.clone(), locks.clone());
        let promoter = Promoter::new(
            store.clone(),
            vector_index.clone() as Arc<dyn IVectorIndex>,
            lexical_index.clone() as Arc<dyn ILexicalIndex>,
            locks.clone(),
            config.lifecycle.clone(),
        );

        let consistency_checker = ConsistencyChecker::new(
            store.clone(),
            vector_index.clone() as Arc<dyn IVectorIndex>,
            lexical_index.clone() as Arc<dyn ILexicalIndex>,
            embedder.clone() as Arc<dyn IEmbedder>,
            config.consistency.clone(),
        );
        let reindexer = Reindexer::new(
            store.clone(),
            vector_index.clone() as Arc<dyn IVectorIndex>,
            embedder.clone() as Arc<dyn IEmbedder>,
        );

        let assembler = ContextAssembler::new();

        Ok(Self {
            store,
            vector_index,
            lexical_index,
            embedder,
            retrieval,
            summarizer,
            locks,
            outcome_recorder,
            promoter,
            consistency_checker,
            reindexer,
            assembler,
            config,
            message_counts: DashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

pub(crate) fn invalid(reason: impl Into<String>) -> CortexError {
    CortexError::InvalidInput(reason.into())
}
