//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ragsearch::PipelineOptions;
use ragsearch::rag::Source;
use ragsearch_telemetry::{LogFormat, LoggingConfig};

/// RAG Search - ask questions about your own documents
#[derive(Parser, Debug)]
#[command(
    name = "ragsearch",
    version,
    about = "Answer questions from your documents with retrieval-augmented generation",
    after_help = "EXAMPLES:\n    \
                  ragsearch ask \"What is deep learning?\"\n    \
                  ragsearch --source docs/ --source notes.md repl\n    \
                  ragsearch --config ragsearch.toml --embedding hashing ask --json \"What is a tensor?\""
)]
pub struct Cli {
    /// TOML file with pipeline options
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// URL, file or directory to index (repeatable; replaces configured sources)
    #[arg(short = 's', long = "source", global = true)]
    pub sources: Vec<String>,

    /// Maximum chunk length in characters
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long, global = true)]
    pub chunk_overlap: Option<usize>,

    /// Chunks retrieved per question
    #[arg(short = 'k', long, global = true)]
    pub top_k: Option<usize>,

    /// Chat model as provider:model
    #[arg(short, long, global = true, env = "RAGSEARCH_MODEL")]
    pub model: Option<String>,

    /// Embedding model as provider:model, or "hashing" for offline use
    #[arg(long, global = true, env = "RAGSEARCH_EMBEDDING")]
    pub embedding: Option<String>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands. Without one, the interactive prompt starts.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer a single question and exit
    Ask {
        /// The question (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask questions interactively
    Repl,
}

impl Cli {
    /// The effective command.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Repl)
    }

    /// Pipeline options: the config file (or defaults) overridden by flags.
    pub fn options(&self) -> Result<PipelineOptions> {
        let mut options = match &self.config {
            Some(path) => PipelineOptions::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => PipelineOptions::default(),
        };

        if !self.sources.is_empty() {
            options.sources = self.sources.iter().map(|s| Source::parse(s)).collect();
        }
        if let Some(chunk_size) = self.chunk_size {
            options.chunk_size = chunk_size;
        }
        if let Some(chunk_overlap) = self.chunk_overlap {
            options.chunk_overlap = chunk_overlap;
        }
        if let Some(top_k) = self.top_k {
            options.top_k = top_k;
        }
        if let Some(model) = &self.model {
            options.llm_model = model.clone();
        }
        if let Some(embedding) = &self.embedding {
            options.embedding_model = embedding.clone();
        }

        options.validate()?;
        Ok(options)
    }

    pub fn logging(&self) -> LoggingConfig {
        let mut config = LoggingConfig::with_level(&self.log_level);
        if self.log_json {
            config.format = LogFormat::Json;
        }
        config
    }
}
