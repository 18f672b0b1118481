//! Provider abstractions for the opaque model functions
//!
//! The embedding function (text → vector) and the language-model endpoint
//! (prompt → text) are narrow capability interfaces implemented by
//! swappable adapters, so the pipeline never depends on a specific model
//! provider.

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod testing;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm, OllamaProvider};
