//! In-memory document index
//!
//! Chunks are prepared offline (the ingestion script chunks the reference
//! books) and shipped as a JSON file; the index embeds them once at load and
//! serves cosine top-k lookups for the life of the process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use krishi_agent_core::{Error, Result};

use crate::embeddings::{cosine, SimpleEmbedder};

/// One pre-chunked document passage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    #[serde(default)]
    pub id: String,
    pub text: String,
    /// Document the chunk came from
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    chunks: Vec<IndexedChunk>,
}

/// Retrieval hit
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

/// Embedded chunk collection with cosine search
pub struct DocumentIndex {
    embedder: SimpleEmbedder,
    chunks: Vec<(IndexedChunk, Vec<f32>)>,
}

impl DocumentIndex {
    /// Build an index over chunks, embedding each once
    pub fn from_chunks(chunks: Vec<IndexedChunk>) -> Self {
        let embedder = SimpleEmbedder::new();
        let chunks = chunks
            .into_iter()
            .map(|c| {
                let embedding = embedder.embed(&c.text);
                (c, embedding)
            })
            .collect();
        Self { embedder, chunks }
    }

    /// Load the chunk file produced by the ingestion script.
    ///
    /// A missing file is not fatal: the assistant runs without a knowledge
    /// base and document questions get an honest "not available" answer.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Retrieval(format!("cannot read {}: {e}", path.display())))?;
        let file: IndexFile = serde_json::from_str(&raw)
            .map_err(|e| Error::Retrieval(format!("cannot parse {}: {e}", path.display())))?;

        tracing::info!(
            chunks = file.chunks.len(),
            path = %path.display(),
            "Document index loaded"
        );
        Ok(Self::from_chunks(file.chunks))
    }

    /// An empty index; every search misses
    pub fn empty() -> Self {
        Self::from_chunks(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top-k chunks by cosine similarity to the query
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ScoredChunk> {
        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|(chunk, embedding)| ScoredChunk {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                score: cosine(&query_embedding, embedding),
            })
            .filter(|s| s.score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}
