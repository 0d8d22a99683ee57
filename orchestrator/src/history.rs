//! Append-only audit log of dispatches

use chrono::{DateTime, Utc};
use maestro_agent::DispatchResult;
use serde::{Deserialize, Serialize};

/// One dispatch: which agent, which task, what came back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub agent: String,
    pub task: String,
    pub result: DispatchResult,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(agent: impl Into<String>, task: impl Into<String>, result: DispatchResult) -> Self {
        Self {
            agent: agent.into(),
            task: task.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered dispatch log, oldest first
#[derive(Debug, Clone, Default)]
pub struct ExecutionHistory {
    entries: Vec<HistoryEntry>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Duplicates are kept.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order_and_duplicates() {
        let mut history = ExecutionHistory::new();
        let ok = DispatchResult::success("a");

        history.record(HistoryEntry::new("one", "a", ok.clone()));
        history.record(HistoryEntry::new("one", "a", ok));
        history.record(HistoryEntry::new("two", "b", DispatchResult::failure("b", "boom")));

        let agents: Vec<_> = history.all().iter().map(|e| e.agent.as_str()).collect();
        assert_eq!(agents, ["one", "one", "two"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut history = ExecutionHistory::new();
        history.record(HistoryEntry::new("one", "a", DispatchResult::success("a")));

        history.clear();
        history.clear();
        assert!(history.is_empty());
    }
}
