//! Embedding index: build, persist, reload, and nearest-neighbor search
//!
//! The index is the only durable artifact of the pipeline. It is built once
//! per ingestion run, persisted atomically, and loaded read-only at query
//! time; there is no incremental insert, update, or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ingestion::Chunk;
use crate::providers::EmbeddingProvider;

/// Filename of the persisted index inside the index directory
pub const INDEX_FILE: &str = "index.json";

/// Bumped whenever the persisted layout changes incompatibly
const INDEX_FORMAT_VERSION: u32 = 1;

/// Metadata recorded alongside the vectors
///
/// The embedding model identity is versioned here: an index built with one
/// model must not be queried through another, so the loader rejects any
/// model-name or dimensionality mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Persisted layout version
    pub format_version: u32,
    /// Embedding model the vectors were produced with
    pub model: String,
    /// Embedding dimensionality
    pub dimensions: usize,
    /// SHA-256 of the normalized corpus text
    pub corpus_sha256: String,
    /// Chunk size used at build time
    pub chunk_size: usize,
    /// Chunk overlap used at build time
    pub chunk_overlap: usize,
    /// Build timestamp
    pub built_at: DateTime<Utc>,
}

/// One indexed chunk with its embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    seq: u32,
    text: String,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Sequence position of the chunk within the corpus
    pub seq: u32,
    /// Chunk text
    pub text: String,
    /// Cosine similarity to the query (higher is more relevant)
    pub similarity: f32,
}

/// Build-time inputs recorded in the index metadata
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Chunk size used to produce the chunks
    pub chunk_size: usize,
    /// Chunk overlap used to produce the chunks
    pub chunk_overlap: usize,
    /// SHA-256 of the normalized corpus text
    pub corpus_sha256: String,
}

/// Persistent similarity-searchable index over embedded chunks
#[derive(Debug)]
pub struct VectorIndex {
    meta: IndexMeta,
    entries: Vec<IndexEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    meta: IndexMeta,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed every chunk and build an in-memory index
    ///
    /// Fails if the embedding provider returns a vector whose length differs
    /// from its declared dimensionality.
    pub async fn build(
        chunks: &[Chunk],
        embedder: &dyn EmbeddingProvider,
        info: BuildInfo,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let dimensions = embedder.dimensions();
        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(Error::embedding(format!(
                    "model '{}' returned a {}-dimensional vector, expected {}",
                    embedder.model(),
                    embedding.len(),
                    dimensions
                )));
            }
            entries.push(IndexEntry {
                seq: chunk.seq,
                text: chunk.text.clone(),
                embedding,
            });
        }

        Ok(Self {
            meta: IndexMeta {
                format_version: INDEX_FORMAT_VERSION,
                model: embedder.model().to_string(),
                dimensions,
                corpus_sha256: info.corpus_sha256,
                chunk_size: info.chunk_size,
                chunk_overlap: info.chunk_overlap,
                built_at: Utc::now(),
            },
            entries,
        })
    }

    /// Persist the index under `dir`, replacing any prior index wholesale
    ///
    /// The file is written to a temporary name and renamed into place, so a
    /// failed build never leaves a half-written index behind.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let persisted = PersistedIndex {
            meta: self.meta.clone(),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_vec(&persisted)?;

        let final_path = dir.join(INDEX_FILE);
        let tmp_path = dir.join(format!("{INDEX_FILE}.tmp"));
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &final_path)?;

        tracing::info!(
            "Persisted index: {} chunks, {} dims, model '{}' -> {}",
            self.entries.len(),
            self.meta.dimensions,
            self.meta.model,
            final_path.display()
        );
        Ok(final_path)
    }

    /// Load a previously persisted index from `dir`
    ///
    /// Fails with [`Error::IndexNotFound`] when no index was ever persisted
    /// there, and with [`Error::IndexCorrupt`] when the file cannot be
    /// decoded or the given embedder does not match the model the index was
    /// built with.
    pub fn load(dir: &Path, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        if !path.exists() {
            return Err(Error::IndexNotFound(dir.to_path_buf()));
        }

        let data = std::fs::read(&path)?;
        let persisted: PersistedIndex = serde_json::from_slice(&data)
            .map_err(|e| Error::index_corrupt(format!("undecodable index file: {e}")))?;

        if persisted.meta.format_version != INDEX_FORMAT_VERSION {
            return Err(Error::index_corrupt(format!(
                "index format v{} is not supported (expected v{INDEX_FORMAT_VERSION})",
                persisted.meta.format_version
            )));
        }
        if persisted.meta.model != embedder.model() {
            return Err(Error::index_corrupt(format!(
                "index was built with embedding model '{}' but '{}' is configured",
                persisted.meta.model,
                embedder.model()
            )));
        }
        if persisted.meta.dimensions != embedder.dimensions() {
            return Err(Error::index_corrupt(format!(
                "index stores {}-dimensional vectors but the embedder produces {}",
                persisted.meta.dimensions,
                embedder.dimensions()
            )));
        }
        // A truncated entry vector would silently skew cosine scores.
        if let Some(entry) = persisted
            .entries
            .iter()
            .find(|e| e.embedding.len() != persisted.meta.dimensions)
        {
            return Err(Error::index_corrupt(format!(
                "entry {} stores a {}-dimensional vector, metadata says {}",
                entry.seq,
                entry.embedding.len(),
                persisted.meta.dimensions
            )));
        }

        Ok(Self {
            meta: persisted.meta,
            entries: persisted.entries,
        })
    }

    /// Return the `k` entries nearest to `query` in descending similarity
    ///
    /// When the index holds fewer than `k` entries, all entries are
    /// returned, still ordered. The index itself is never mutated.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.meta.dimensions {
            return Err(Error::index_corrupt(format!(
                "query vector has {} dimensions, index stores {}",
                query.len(),
                self.meta.dimensions
            )));
        }

        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                seq: entry.seq,
                text: entry.text.clone(),
                similarity: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }

    /// Index metadata
    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::HashEmbedder;

    fn chunk(seq: u32, text: &str) -> Chunk {
        Chunk {
            seq,
            text: text.to_string(),
            start: 0,
            end: text.len(),
        }
    }

    fn build_info() -> BuildInfo {
        BuildInfo {
            chunk_size: 500,
            chunk_overlap: 100,
            corpus_sha256: "deadbeef".to_string(),
        }
    }

    #[tokio::test]
    async fn search_orders_by_descending_similarity() {
        let embedder = HashEmbedder::new(64);
        let chunks = vec![
            chunk(0, "the capital of France is Paris"),
            chunk(1, "water boils at one hundred degrees"),
            chunk(2, "rust has a strong type system"),
        ];
        let index = VectorIndex::build(&chunks, &embedder, build_info())
            .await
            .unwrap();

        let query = embedder.embed_sync("what is the capital of France");
        let results = index.search(&query, 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].seq, 0);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[tokio::test]
    async fn oversized_k_returns_all_entries() {
        let embedder = HashEmbedder::new(32);
        let chunks = vec![chunk(0, "alpha"), chunk(1, "beta")];
        let index = VectorIndex::build(&chunks, &embedder, build_info())
            .await
            .unwrap();
        let query = embedder.embed_sync("alpha");
        assert_eq!(index.search(&query, 10).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn persist_and_reload_round_trips() {
        let embedder = HashEmbedder::new(48);
        let chunks = vec![
            chunk(0, "grounding keeps answers inside the context"),
            chunk(1, "overlap preserves continuity across chunks"),
        ];
        let index = VectorIndex::build(&chunks, &embedder, build_info())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        index.persist(dir.path()).unwrap();
        let reloaded = VectorIndex::load(dir.path(), &embedder).unwrap();

        assert_eq!(reloaded.len(), index.len());
        assert_eq!(reloaded.meta().model, index.meta().model);

        let query = embedder.embed_sync("what preserves continuity");
        let before: Vec<u32> = index.search(&query, 2).unwrap().iter().map(|r| r.seq).collect();
        let after: Vec<u32> = reloaded.search(&query, 2).unwrap().iter().map(|r| r.seq).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_index_is_index_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = HashEmbedder::new(16);
        let err = VectorIndex::load(dir.path(), &embedder).unwrap_err();
        assert!(matches!(err, Error::IndexNotFound(_)));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_index_corrupt() {
        let embedder = HashEmbedder::new(32);
        let chunks = vec![chunk(0, "some indexed text")];
        let index = VectorIndex::build(&chunks, &embedder, build_info())
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        index.persist(dir.path()).unwrap();

        let other = HashEmbedder::new(64);
        let err = VectorIndex::load(dir.path(), &other).unwrap_err();
        assert!(matches!(err, Error::IndexCorrupt(_)));
    }

    #[tokio::test]
    async fn truncated_entry_vector_is_index_corrupt() {
        let embedder = HashEmbedder::new(32);
        let chunks = vec![chunk(0, "first entry"), chunk(1, "second entry")];
        let index = VectorIndex::build(&chunks, &embedder, build_info())
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = index.persist(dir.path()).unwrap();

        // Truncate one entry's vector without touching the metadata.
        let data = std::fs::read(&path).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        let embedding = value["entries"][1]["embedding"].as_array_mut().unwrap();
        embedding.truncate(16);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        let err = VectorIndex::load(dir.path(), &embedder).unwrap_err();
        assert!(matches!(err, Error::IndexCorrupt(_)));
    }

    #[test]
    fn undecodable_file_is_index_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), b"not json at all").unwrap();
        let embedder = HashEmbedder::new(16);
        let err = VectorIndex::load(dir.path(), &embedder).unwrap_err();
        assert!(matches!(err, Error::IndexCorrupt(_)));
    }

    #[test]
    fn cosine_similarity_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        let sim = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }
}
