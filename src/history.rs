//! Chat history bookkeeping.
//!
//! An append-only ordered sequence of strings owned by a single caller.
//! No internal synchronization — callers coordinate access themselves.

use std::collections::HashSet;

/// Ordered record of prompts and responses for one adapter session.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Vec<String>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the history.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// De-duplicated view of the history. Set-backed, so the order of the
    /// returned entries is unspecified.
    pub fn unique(&self) -> Vec<String> {
        let set: HashSet<&String> = self.entries.iter().collect();
        set.into_iter().cloned().collect()
    }

    /// Number of distinct entries.
    pub fn unique_len(&self) -> usize {
        self.entries.iter().collect::<HashSet<_>>().len()
    }
}
