use clap::Parser;
use recap_context::{DEFAULT_SEPARATORS, SplitConfig, TextSplitter};
use std::fs;
use std::io::{self, Read};

/// A CLI tool that splits a transcript into overlapping chunks as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Maximum length of each chunk, in characters.
    #[arg(short = 's', long, default_value_t = 1000)]
    chunk_size: usize,

    /// Trailing characters of each chunk repeated at the start of the next.
    #[arg(short = 'o', long, default_value_t = 200)]
    chunk_overlap: usize,

    /// Comma-separated separator list, coarsest first. An empty entry means
    /// a hard character cut. Defaults to the transcript separators.
    #[arg(long, value_delimiter = ',')]
    separators: Option<Vec<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let text = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let separators = args
        .separators
        .unwrap_or_else(|| DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect());

    let splitter = TextSplitter::new(
        SplitConfig::default()
            .with_chunk_size(args.chunk_size)
            .with_chunk_overlap(args.chunk_overlap)
            .with_separators(separators),
    )?;

    let chunks = splitter.split(&text);
    println!("{}", serde_json::to_string_pretty(&chunks)?);

    Ok(())
}
