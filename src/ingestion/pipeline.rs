//! Batch ingestion: load, normalize, chunk, embed, persist

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::index::{BuildInfo, VectorIndex};
use crate::providers::EmbeddingProvider;

use super::chunker::TextChunker;
use super::loader::DocumentLoader;
use super::normalizer::Normalizer;

/// Summary of one ingestion run
#[derive(Debug)]
pub struct IngestReport {
    /// Number of source files that contributed text
    pub files: usize,
    /// Number of chunks indexed
    pub chunks: usize,
    /// Embedding dimensionality of the built index
    pub dimensions: usize,
    /// Location of the persisted index file
    pub index_path: PathBuf,
}

/// One-shot batch ingestion pipeline
///
/// Runs to completion before any query is served; concurrent runs against
/// the same index location are the caller's responsibility to serialize.
/// Any failure aborts the run with no index persisted.
pub struct IngestPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IngestPipeline {
    /// Create a pipeline from configuration and an embedding provider
    pub fn new(config: RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { config, embedder }
    }

    /// Ingest every supported document under `source_dir` and persist the
    /// rebuilt index, replacing any prior index wholesale
    pub async fn run(&self, source_dir: &Path) -> Result<IngestReport> {
        let loader = DocumentLoader::new(&self.config.ingestion.extensions);
        let files = loader.supported_files(source_dir).len();

        tracing::info!("Loading corpus from {}", source_dir.display());
        let raw = loader.load_dir(source_dir)?;

        let normalizer = Normalizer::new(&self.config.ingestion.boilerplate);
        let cleaned = normalizer.normalize(&raw);

        let chunker = TextChunker::new(
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap,
        );
        let chunks = chunker.chunk_text(&cleaned);
        // A corpus that normalization consumed entirely must fail the run,
        // not persist an index that answers every query with nothing.
        if chunks.is_empty() {
            return Err(Error::NotFound(source_dir.to_path_buf()));
        }
        tracing::info!(
            "Chunked corpus into {} chunk(s) (size {}, overlap {})",
            chunks.len(),
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap
        );

        let corpus_sha256 = hex_digest(&cleaned);
        let index = VectorIndex::build(
            &chunks,
            self.embedder.as_ref(),
            BuildInfo {
                chunk_size: self.config.chunking.chunk_size,
                chunk_overlap: self.config.chunking.chunk_overlap,
                corpus_sha256,
            },
        )
        .await?;

        let index_path = index.persist(&self.config.index.dir)?;

        Ok(IngestReport {
            files,
            chunks: index.len(),
            dimensions: index.meta().dimensions,
            index_path,
        })
    }
}

fn hex_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
