//! Grounded answer generation: the single query-time surface

use std::sync::Arc;

use crate::error::Result;
use crate::index::VectorIndex;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::Retriever;

use super::prompt::PromptBuilder;

/// Query-time engine: retrieve, assemble, generate
///
/// Built once per process from a loaded index and provider handles, then
/// shared; `answer_query` holds no mutable state and may be called
/// concurrently.
pub struct QueryEngine {
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl QueryEngine {
    /// Create a query engine over a loaded index
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever: Retriever::new(index, embedder),
            llm,
            top_k,
        }
    }

    /// Answer a question from the indexed corpus
    ///
    /// Retrieves the top-k nearest chunks, assembles the grounded prompt,
    /// and returns the language model's raw text response unmodified.
    /// Endpoint failures surface as [`crate::Error::Generation`] with no
    /// retry; retry policy belongs to the caller.
    pub async fn answer_query(&self, query: &str) -> Result<String> {
        let retrieved = self.retriever.retrieve(query, self.top_k).await?;
        let context = PromptBuilder::build_context(&retrieved);
        let prompt = PromptBuilder::build_rag_prompt(query, &context);
        self.llm.generate(&prompt).await
    }
}
