//! Query-time retrieval of the nearest chunks

use std::sync::Arc;

use crate::error::Result;
use crate::index::{ScoredChunk, VectorIndex};
use crate::providers::EmbeddingProvider;

/// Retrieves the top-k chunks nearest to a query
///
/// Read-only over the index; safe to share across concurrent queries.
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a retriever over a loaded index
    ///
    /// The embedder must be the same model the index was built with; the
    /// index loader enforces this.
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// Embed `query` and return up to `k` chunks in descending similarity
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.index.search(&query_embedding, k)?;
        tracing::debug!(
            "Retrieved {} chunk(s) for query (k={}, index size {})",
            results.len(),
            k,
            self.index.len()
        );
        Ok(results)
    }

    /// The underlying index
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }
}
