//! Event Log
//!
//! Most-recent-first record of every stream frame, pretty-printed for the
//! operator's log panel.
//!
//! The log is a ring buffer: once `capacity` entries are held, each new
//! frame evicts the oldest. A capacity of 0 keeps everything.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One logged frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub received_at: DateTime<Utc>,
    /// Frame as indented JSON
    pub text: String,
}

/// Bounded, newest-first frame log
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    evicted: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 200;

    /// Create a log holding at most `capacity` entries (0 = unbounded)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            evicted: 0,
        }
    }

    /// Log a decoded frame
    pub fn push(&mut self, frame: &serde_json::Value) {
        // Serializing a Value cannot fail; fall back to the compact form anyway
        let text = serde_json::to_string_pretty(frame).unwrap_or_else(|_| frame.to_string());
        self.push_text(text);
    }

    fn push_text(&mut self, text: String) {
        self.entries.push_front(LogEntry {
            received_at: Utc::now(),
            text,
        });

        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                self.entries.pop_back();
                self.evicted += 1;
            }
        }
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped to honor the capacity
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// The panel text: each entry followed by a newline, newest first
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.text);
            out.push('\n');
        }
        out
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newest_first() {
        let mut log = EventLog::new(10);
        log.push(&json!({"event": "train_start", "train_id": "T1"}));
        log.push(&json!({"event": "count"}));

        let texts: Vec<_> = log.iter().map(|e| e.text.clone()).collect();
        assert!(texts[0].contains("\"count\""));
        assert!(texts[1].contains("\"train_start\""));
        assert_eq!(log.latest().unwrap().text, texts[0]);
    }

    #[test]
    fn test_pretty_printed_two_space_indent() {
        let mut log = EventLog::new(10);
        log.push(&json!({"event": "count"}));
        assert_eq!(log.latest().unwrap().text, "{\n  \"event\": \"count\"\n}");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(&json!({ "seq": i }));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.evicted(), 2);
        let texts: Vec<_> = log.iter().map(|e| e.text.clone()).collect();
        assert!(texts[0].contains('4'));
        assert!(texts[2].contains('2'));
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let mut log = EventLog::new(0);
        for i in 0..500 {
            log.push(&json!(i));
        }
        assert_eq!(log.len(), 500);
        assert_eq!(log.evicted(), 0);
    }

    #[test]
    fn test_render_matches_panel_text() {
        let mut log = EventLog::new(10);
        log.push(&json!(1));
        log.push(&json!(2));
        assert_eq!(log.render(), "2\n1\n");

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.render(), "");
    }
}
