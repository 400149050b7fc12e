use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub turn: u32,
    pub severity: Severity,
    pub message: String,
}

/// Bounded feed of user-facing messages; the oldest entry is dropped once
/// `capacity` is reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    capacity: usize,
    entries: VecDeque<Notification>,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, turn: u32, severity: Severity, message: impl Into<String>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            turn,
            severity,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_only_most_recent_entries() {
        let mut log = NotificationLog::with_capacity(10);
        for i in 0..15 {
            log.push(i, Severity::Info, format!("message {i}"));
        }
        assert_eq!(log.len(), 10);
        assert_eq!(log.iter().next().map(|n| n.turn), Some(5));
        assert_eq!(log.latest().map(|n| n.message.as_str()), Some("message 14"));
    }
}
