//! Questions asked during an interactive session.

use std::collections::VecDeque;
use std::time::Duration;

use ragsearch::AskResponse;

/// Entries kept and shown by `:history`.
pub const HISTORY_DISPLAY: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub elapsed: Duration,
}

impl From<&AskResponse> for HistoryEntry {
    fn from(response: &AskResponse) -> Self {
        Self {
            question: response.question.clone(),
            answer: response.answer.clone(),
            elapsed: response.elapsed,
        }
    }
}

/// The most recent [`HISTORY_DISPLAY`] questions of a session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: VecDeque<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, evicting the oldest once [`HISTORY_DISPLAY`] are held.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_DISPLAY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(n)
    }

    /// The `:history` listing.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No questions asked yet.".to_string();
        }
        let mut out = String::from("Search History\n");
        for entry in self.recent(HISTORY_DISPLAY) {
            out.push_str(&format!(
                "---\nQ: {}\nA: {}\nResponse time: {:.2} seconds\n",
                entry.question,
                entry.answer,
                entry.elapsed.as_secs_f64()
            ));
        }
        out
    }
}
