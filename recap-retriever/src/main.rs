use anyhow::Context;
use clap::Parser;
use recap_embed::GeminiEmbedProvider;
use recap_retriever::{RetrievalConfig, RetrievalEngine};
use std::io::Read;
use std::sync::Arc;

/// Retrieve the most relevant sections of a transcript for an instruction.
///
/// Reads a transcript from a file or stdin, runs the retrieval pipeline
/// against the Gemini embedding API (configured via GEMINI_API_KEY,
/// GEMINI_EMBED_MODEL, GEMINI_API_BASE), and prints the excerpt.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the transcript file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// The instruction to retrieve context for.
    #[arg(short = 'q', long)]
    instruction: String,

    /// Maximum chunk length, in characters.
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between adjacent chunks, in characters.
    #[arg(long, default_value_t = 200)]
    chunk_overlap: usize,

    /// Number of chunks assembled into the excerpt.
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Emit the full retrieval result as JSON instead of the excerpt only.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let text = if let Some(path) = &args.input {
        std::fs::read_to_string(path).with_context(|| format!("reading transcript {path}"))?
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading transcript from stdin")?;
        buffer
    };

    let provider = Arc::new(GeminiEmbedProvider::from_env()?);
    let engine = RetrievalEngine::new(
        RetrievalConfig::default()
            .with_chunk_size(args.chunk_size)
            .with_chunk_overlap(args.chunk_overlap)
            .with_top_k(args.top_k),
        provider,
    )?;

    let context = engine.retrieve(&text, &args.instruction).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else {
        println!("{}", context.excerpt);
    }

    Ok(())
}
