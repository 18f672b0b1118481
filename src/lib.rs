//! grounded-rag: retrieval-augmented question answering over a private
//! document collection
//!
//! Offline, the ingestion pipeline extracts text from source documents,
//! normalizes it, splits it into overlapping chunks, embeds them, and
//! persists a similarity-searchable index. Online, each query is embedded,
//! the nearest chunks are retrieved, and a grounding-constrained prompt is
//! submitted to a language-model endpoint.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::{PromptBuilder, QueryEngine, GROUNDING_INSTRUCTION};
pub use index::{ScoredChunk, VectorIndex};
pub use ingestion::{Chunk, DocumentLoader, IngestPipeline, IngestReport, Normalizer, TextChunker};
pub use providers::{EmbeddingProvider, LlmProvider, OllamaProvider};
pub use retrieval::Retriever;
