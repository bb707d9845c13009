//! Hash-based text embeddings
//!
//! Deterministic token-hash embeddings: every token hashes into a fixed
//! number of buckets, counts are L2-normalized. No model download, identical
//! treatment for documents and queries, and good enough for a small
//! reference collection where vocabulary overlap carries the signal.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Embedding dimensionality
pub const EMBEDDING_DIM: usize = 256;

/// Deterministic hashing embedder
#[derive(Debug, Clone, Default)]
pub struct SimpleEmbedder;

impl SimpleEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embed text into a normalized vector
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];

        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % EMBEDDING_DIM;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_string())
        .collect()
}

/// Cosine similarity between two equal-length vectors
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_normalized() {
        let v = SimpleEmbedder::new().embed("wheat sowing in november");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_identical_text_identical_embedding() {
        let embedder = SimpleEmbedder::new();
        assert_eq!(embedder.embed("soil moisture"), embedder.embed("soil moisture"));
    }

    #[test]
    fn test_overlapping_text_scores_higher() {
        let embedder = SimpleEmbedder::new();
        let query = embedder.embed("when to sow wheat");
        let relevant = embedder.embed("wheat should be sown in November when soil cools");
        let unrelated = embedder.embed("tractor loan interest rates for farmers");
        assert!(cosine(&query, &relevant) > cosine(&query, &unrelated));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = SimpleEmbedder::new().embed("");
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
