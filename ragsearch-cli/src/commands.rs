//! `ask` and `repl`.

use anyhow::{Context, Result};
use ragsearch::{AskResponse, Pipeline, PipelineOptions, global};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::history::{HistoryEntry, SearchHistory};

const PROMPT: &str = "question> ";

/// Build the process-wide pipeline, once.
pub async fn load_pipeline(options: &PipelineOptions) -> Result<&'static Pipeline> {
    eprintln!("Initializing RAG system from {} source(s)...", options.sources.len());
    let pipeline = global().initialize(options).await.context("initializing the RAG system")?;
    eprintln!(
        "System ready! {} chunks indexed from {} documents.",
        pipeline.chunk_count(),
        pipeline.document_count()
    );
    Ok(pipeline)
}

/// Answer one question and print it.
pub async fn ask(options: &PipelineOptions, question: &str, json: bool) -> Result<()> {
    let pipeline = load_pipeline(options).await?;
    let response = pipeline.ask(question).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_response(&response));
    }
    Ok(())
}

/// Read questions until EOF, Ctrl-C or `:quit`.
pub async fn repl(options: &PipelineOptions) -> Result<()> {
    let pipeline = load_pipeline(options).await?;
    let mut editor = DefaultEditor::new()?;
    let mut history = SearchHistory::new();

    println!("Ask a question about your documents. Commands: :history, :quit");
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        match line {
            ":quit" | ":exit" | ":q" => break,
            ":history" => println!("{}", history.render()),
            question => match pipeline.ask(question).await {
                Ok(response) => {
                    print!("{}", render_response(&response));
                    history.push(HistoryEntry::from(&response));
                }
                Err(e) => eprintln!("Error: {e}"),
            },
        }
    }
    Ok(())
}

/// Human-readable rendering of a response.
pub fn render_response(response: &AskResponse) -> String {
    let mut out = format!("Answer:\n{}\n", response.answer);
    if !response.retrieved.is_empty() {
        out.push_str("\nSource documents:\n");
        for (i, passage) in response.retrieved.iter().enumerate() {
            match &passage.source {
                Some(source) => out.push_str(&format!("  Document {} ({source}):\n", i + 1)),
                None => out.push_str(&format!("  Document {}:\n", i + 1)),
            }
            for line in passage.preview.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    out.push_str(&format!("\nResponse time: {:.2} seconds\n", response.elapsed.as_secs_f64()));
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ragsearch::RetrievedPassage;

    use super::*;

    #[test]
    fn renders_answer_sources_and_timing() {
        let response = AskResponse {
            question: "What is the capital of France?".into(),
            answer: "Paris.".into(),
            retrieved: vec![
                RetrievedPassage {
                    text: "Paris is the capital of France.".into(),
                    preview: "Paris is the capital of France....".into(),
                    source: Some("france.txt".into()),
                },
                RetrievedPassage { text: "x".into(), preview: "x...".into(), source: None },
            ],
            elapsed: Duration::from_millis(1234),
        };

        let out = render_response(&response);

        assert!(out.starts_with("Answer:\nParis.\n"));
        assert!(out.contains("  Document 1 (france.txt):\n    Paris is the capital of France....\n"));
        assert!(out.contains("  Document 2:\n    x...\n"));
        assert!(out.ends_with("Response time: 1.23 seconds\n"));
    }

    #[test]
    fn omits_sources_section_when_nothing_was_retrieved() {
        let response = AskResponse {
            question: "q".into(),
            answer: "I don't have information about this in the documents.".into(),
            retrieved: Vec::new(),
            elapsed: Duration::ZERO,
        };
        assert!(!render_response(&response).contains("Source documents"));
    }
}
