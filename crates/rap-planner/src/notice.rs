//! User-facing notices
//!
//! Store failures never interrupt editing; they queue here for the UI to
//! show and for the demo binary to print.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Something degraded but the session continues
    Warning,
    /// An operation was lost
    Error,
}

/// One message queued for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Display text
    pub message: String,
}

impl Notice {
    /// Informational notice
    #[inline]
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Warning notice
    #[inline]
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Bounded notice queue; at capacity the oldest entry is dropped
#[derive(Debug)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeLog {
    /// Create a log holding at most `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    /// Queue a notice
    pub fn push(&mut self, notice: Notice) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notice);
    }

    /// Take every queued notice, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        self.entries.drain(..).collect()
    }

    /// Queued notice count
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
