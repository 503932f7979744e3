//! Session changelog
//!
//! Append-only, in-memory record of every delegation decision made by one
//! coordinator. Entries are numbered from 1 in append order.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// One logged decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub session_id: u64,
    pub timestamp: DateTime<Local>,
    pub task: String,
    pub input_type: String,
    pub delegation_target: String,
    pub result: String,
    pub query_analysis_summary: String,
}

/// Fields supplied by the caller for a new entry
#[derive(Debug, Clone)]
pub struct NewEntry<'a> {
    pub task: &'a str,
    pub input_type: &'a str,
    pub delegation_target: &'a str,
    pub result: &'a str,
    pub query_analysis_summary: &'a str,
}

/// Append-only changelog. Appends are serialized; reads return a snapshot.
#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Mutex<Vec<ChangelogEntry>>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChangelogEntry>> {
        // Entries are only ever pushed whole, so a poisoned lock still holds a consistent log.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a new entry, assigning the next session id and the current time
    pub fn append(&self, new: NewEntry<'_>) -> ChangelogEntry {
        let mut entries = self.lock();

        let entry = ChangelogEntry {
            session_id: entries.len() as u64 + 1,
            timestamp: Local::now(),
            task: new.task.to_string(),
            input_type: new.input_type.to_string(),
            delegation_target: new.delegation_target.to_string(),
            result: new.result.to_string(),
            query_analysis_summary: new.query_analysis_summary.to_string(),
        };
        entries.push(entry.clone());

        log::info!(
            "Changelog #{} recorded: {} -> {}",
            entry.session_id,
            excerpt(&entry.task, 50),
            entry.delegation_target
        );
        entry
    }

    /// Snapshot of all entries in append order
    pub fn entries(&self) -> Vec<ChangelogEntry> {
        self.lock().clone()
    }
}

/// Collapse whitespace and cut to `max_chars` characters
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = lazy_regex::regex_replace_all!(r"\s+", text.trim(), " ");
    if collapsed.chars().count() <= max_chars {
        collapsed.into_owned()
    } else {
        let cut: String = collapsed.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
