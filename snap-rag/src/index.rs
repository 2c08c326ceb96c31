//! In-memory vector index with cosine top-k retrieval.
//!
//! The index is bulk-loaded once during startup and read-only afterwards,
//! so a plain `Vec` scan is all the structure this corpus size needs.

use crate::types::RagError;

/// One stored (id, vector, text) triple.
#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    embedding: Vec<f32>,
    content: String,
}

/// A retrieval hit, nearest-first in query results.
#[derive(Debug, Clone)]
pub struct Retrieved {
    /// Id the entry was inserted under.
    pub id: String,
    /// Stored chunk text.
    pub content: String,
    /// Cosine similarity to the query vector.
    pub score: f32,
}

/// In-memory nearest-neighbor store over chunk embeddings.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Ids are unique per index; reusing one is an error.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        embedding: Vec<f32>,
        content: impl Into<String>,
    ) -> Result<(), RagError> {
        let id = id.into();
        if self.entries.iter().any(|entry| entry.id == id) {
            return Err(RagError::DuplicateId(id));
        }
        self.entries.push(IndexEntry {
            id,
            embedding,
            content: content.into(),
        });
        Ok(())
    }

    /// Returns up to `top_k` entries nearest to `query` by cosine
    /// similarity, nearest first. An empty index or `top_k == 0` yields an
    /// empty result.
    pub fn query(&self, query: &[f32], top_k: usize) -> Vec<Retrieved> {
        let mut hits: Vec<Retrieved> = self
            .entries
            .iter()
            .map(|entry| Retrieved {
                id: entry.id.clone(),
                content: entry.content.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity; zero for mismatched dimensions or zero-norm vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_index() -> VectorIndex {
        let mut index = VectorIndex::new();
        index.insert("0", vec![1.0, 0.0], "east").unwrap();
        index.insert("1", vec![0.0, 1.0], "north").unwrap();
        index.insert("2", vec![0.7, 0.7], "northeast").unwrap();
        index
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut index = VectorIndex::new();
        index.insert("0", vec![1.0], "a").unwrap();
        let err = index.insert("0", vec![2.0], "b").unwrap_err();
        assert!(matches!(err, RagError::DuplicateId(id) if id == "0"));
    }

    #[test]
    fn query_on_empty_index_returns_nothing() {
        let index = VectorIndex::new();
        assert!(index.query(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn query_with_k_zero_returns_nothing() {
        let index = filled_index();
        assert!(index.query(&[1.0, 0.0], 0).is_empty());
    }

    #[test]
    fn query_never_returns_more_than_k() {
        let index = filled_index();
        assert_eq!(index.query(&[1.0, 0.0], 2).len(), 2);
        // Fewer than k when the index is smaller than k.
        assert_eq!(index.query(&[1.0, 0.0], 10).len(), 3);
    }

    #[test]
    fn results_are_sorted_nearest_first() {
        let index = filled_index();
        let hits = index.query(&[1.0, 0.0], 3);
        assert_eq!(hits[0].content, "east");
        assert_eq!(hits[1].content, "northeast");
        assert_eq!(hits[2].content, "north");
        assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
    }

    #[test]
    fn self_similarity_ranks_first() {
        let index = filled_index();
        let hits = index.query(&[0.0, 1.0], 1);
        assert_eq!(hits[0].id, "1");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_norm_query_scores_zero() {
        let index = filled_index();
        let hits = index.query(&[0.0, 0.0], 3);
        for hit in hits {
            assert_eq!(hit.score, 0.0);
        }
    }
}
