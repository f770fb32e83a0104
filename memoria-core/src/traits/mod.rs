mod embedding;
mod lexical_index;
mod record_store;
mod vector_index;

pub use embedding::{IEmbedder, IReranker, ISummarizer};
pub use lexical_index::ILexicalIndex;
pub use record_store::IRecordStore;
pub use vector_index::{IVectorIndex, VectorHit};
