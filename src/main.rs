//! grounded-rag CLI
//!
//! `grounded-rag ingest <dir>` rebuilds the persisted index from a
//! directory of documents; `grounded-rag query <question>` answers a
//! question against it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grounded_rag::{
    IngestPipeline, LlmProvider, OllamaProvider, QueryEngine, RagConfig, VectorIndex,
};

#[derive(Parser)]
#[command(name = "grounded-rag", version, about = "Document Q&A grounded in a private corpus")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a directory of documents and rebuild the index
    Ingest {
        /// Directory holding the source documents
        dir: PathBuf,
    },
    /// Answer a question against the persisted index
    Query {
        /// The question to answer
        question: String,
        /// Number of chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grounded_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Errors reach the user as a plain-text message, never a backtrace.
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::default(),
    };
    config.validate()?;

    let provider = OllamaProvider::new(&config.llm, &config.embedding)?;
    if !provider.llm().health_check().await.unwrap_or(false) {
        tracing::warn!("Ollama not reachable at {}", config.llm.base_url);
        tracing::warn!("Start it with: ollama serve");
        tracing::warn!(
            "Then pull models: ollama pull {} && ollama pull {}",
            config.embedding.model,
            config.llm.generate_model
        );
    }

    match cli.command {
        Command::Ingest { dir } => {
            let pipeline = IngestPipeline::new(config, provider.embedder());
            let report = pipeline.run(&dir).await?;
            tracing::info!(
                "Ingested {} file(s) into {} chunk(s) ({} dims)",
                report.files,
                report.chunks,
                report.dimensions
            );
            println!("Index written to {}", report.index_path.display());
        }
        Command::Query { question, top_k } => {
            let embedder = provider.embedder();
            let index = Arc::new(VectorIndex::load(&config.index.dir, embedder.as_ref())?);
            let engine = QueryEngine::new(
                index,
                embedder,
                provider.llm(),
                top_k.unwrap_or(config.retrieval.top_k),
            );
            let answer = engine.answer_query(&question).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
