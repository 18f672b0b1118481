//! Offline ingestion: document loading, normalization, and chunking

mod chunker;
mod loader;
mod normalizer;
mod pipeline;

pub use chunker::{Chunk, TextChunker};
pub use loader::DocumentLoader;
pub use normalizer::Normalizer;
pub use pipeline::{IngestPipeline, IngestReport};
