//! Document-retrieval QA
//!
//! Answers general agricultural questions from a pre-chunked document
//! collection: embed the query, take the top-k chunks by cosine similarity,
//! and let the LLM compose an answer grounded on them. The vector-search
//! internals are deliberately simple - the collection is small and loaded
//! in memory at startup.

pub mod embeddings;
pub mod qa;
pub mod store;

pub use embeddings::SimpleEmbedder;
pub use qa::KnowledgeBase;
pub use store::{DocumentIndex, IndexedChunk, ScoredChunk};
