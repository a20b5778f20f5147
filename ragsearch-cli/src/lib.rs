//! Library half of the `ragsearch` binary.

pub mod args;
pub mod commands;
pub mod history;

use anyhow::Result;

pub use args::{Cli, Command};
pub use history::{HISTORY_DISPLAY, HistoryEntry, SearchHistory};

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let options = cli.options()?;
    match cli.command() {
        Command::Ask { question, json } => commands::ask(&options, &question.join(" "), json).await,
        Command::Repl => commands::repl(&options).await,
    }
}
