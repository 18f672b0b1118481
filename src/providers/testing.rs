//! Deterministic stub providers
//!
//! The embedding function and the LLM endpoint are opaque capabilities;
//! these stubs stand in for them in tests and offline runs without any
//! model server.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::Result;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Deterministic bag-of-words embedder
///
/// Hashes each lowercased word into one of `dimensions` buckets and counts
/// occurrences, so texts sharing vocabulary land close under cosine
/// similarity. `DefaultHasher::new()` uses fixed keys, making the output
/// stable across calls and processes.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a stub embedder with the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Synchronous embedding, handy for building expected values in tests
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "hash-embedder"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// LLM stub that echoes the prompt it received
///
/// Lets tests assert on the exact prompt the pipeline assembled.
pub struct EchoLlm;

#[async_trait]
impl LlmProvider for EchoLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "echo"
    }
}
