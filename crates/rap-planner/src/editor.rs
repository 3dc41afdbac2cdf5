//! Cell editing
//!
//! Numeric day cells buffer locally and commit once when focus leaves; task
//! and comment cells commit after a quiet period or on blur. The strategy
//! trait keeps the two behaviors swappable without the engine knowing which
//! cell kind it is driving.

use rap_model::{parse_hours, AllocationId, AllocationPatch, ResourceAllocation, Workday};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which editable field of an allocation row a cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// One weekday's hours
    Day(Workday),
    /// Task description
    Task,
    /// Free-form comment
    Comment,
}

impl FieldKind {
    /// Whether the field holds hours rather than text
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Day(_))
    }

    /// Field name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Day(day) => day.as_str(),
            Self::Task => "task",
            Self::Comment => "comment",
        }
    }

    /// Turn buffered text into the store patch for this field
    ///
    /// Day cells run through [`parse_hours`], so malformed or negative
    /// input coerces to zero instead of erroring.
    #[must_use]
    pub fn patch_for(&self, text: &str) -> AllocationPatch {
        match self {
            Self::Day(day) => AllocationPatch::hours(*day, parse_hours(text)),
            Self::Task => AllocationPatch::Task(text.to_string()),
            Self::Comment => AllocationPatch::Comment(text.to_string()),
        }
    }

    /// Current cell text for this field of a row
    #[must_use]
    pub fn text_of(&self, allocation: &ResourceAllocation) -> String {
        match self {
            Self::Day(day) => format_hours(allocation.hours.get(*day)),
            Self::Task => allocation.task.clone(),
            Self::Comment => allocation.comment.clone(),
        }
    }
}

/// Hours rendered the way the grid shows them: whole numbers without the
/// trailing fraction
#[must_use]
pub fn format_hours(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Addresses one cell in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddr {
    /// The row
    pub allocation: AllocationId,
    /// The column
    pub field: FieldKind,
}

impl CellAddr {
    /// Create a cell address
    #[inline]
    #[must_use]
    pub fn new(allocation: AllocationId, field: FieldKind) -> Self {
        Self { allocation, field }
    }
}

/// When buffered input reaches the store
pub trait EditStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy name (for logs)
    fn name(&self) -> &'static str;

    /// Deadline for an automatic commit after an input revision, none when
    /// the cell only commits on blur
    fn deadline_after_input(&self, now: Instant) -> Option<Instant>;
}

/// Commit on blur with no quiet period (numeric day cells)
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateCommit;

impl EditStrategy for ImmediateCommit {
    fn name(&self) -> &'static str {
        "immediate"
    }

    fn deadline_after_input(&self, _now: Instant) -> Option<Instant> {
        None
    }
}

/// Commit after a quiet period with no further input (text cells)
#[derive(Debug, Clone, Copy)]
pub struct DebouncedCommit {
    delay: Duration,
}

impl DebouncedCommit {
    /// Create with the quiet period to wait
    #[inline]
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl EditStrategy for DebouncedCommit {
    fn name(&self) -> &'static str {
        "debounced"
    }

    fn deadline_after_input(&self, now: Instant) -> Option<Instant> {
        Some(now + self.delay)
    }
}

/// A field update ready to send to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    /// Which cell produced it
    pub addr: CellAddr,
    /// The text to persist
    pub text: String,
}

impl PendingCommit {
    /// The store patch for this commit
    #[must_use]
    pub fn patch(&self) -> AllocationPatch {
        self.addr.field.patch_for(&self.text)
    }
}

/// The focused cell's local buffer
///
/// The buffer survives grid refreshes; remote values never clobber what the
/// user is typing. `baseline` tracks the last committed text so revisions
/// that type back to it cancel the pending commit instead of re-sending it.
#[derive(Debug)]
pub struct CellEditor {
    addr: CellAddr,
    strategy: Arc<dyn EditStrategy>,
    baseline: String,
    buffer: String,
    deadline: Option<Instant>,
}

impl CellEditor {
    /// Open an editor on a cell showing `current` text
    #[must_use]
    pub fn open(addr: CellAddr, strategy: Arc<dyn EditStrategy>, current: String) -> Self {
        Self {
            addr,
            strategy,
            baseline: current.clone(),
            buffer: current,
            deadline: None,
        }
    }

    /// The cell being edited
    #[inline]
    #[must_use]
    pub fn addr(&self) -> CellAddr {
        self.addr
    }

    /// Current local text
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Whether committing the buffer would change the stored field
    ///
    /// Day cells compare parsed hours, so unparsable text over a committed
    /// zero is clean; text cells compare verbatim.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.addr.field.patch_for(&self.buffer) != self.addr.field.patch_for(&self.baseline)
    }

    /// Armed debounce deadline, if any
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Feed one input revision
    ///
    /// Nothing commits here: debounced strategies arm (or re-arm) their
    /// deadline, immediate ones wait for the blur. A revision back to the
    /// baseline disarms any pending deadline.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.buffer = text.into();
        if self.is_dirty() {
            self.deadline = self.strategy.deadline_after_input(now);
        } else {
            self.deadline = None;
        }
    }

    /// Fire the debounce timer if it is due
    pub fn poll(&mut self, now: Instant) -> Option<PendingCommit> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.baseline = self.buffer.clone();
                Some(PendingCommit {
                    addr: self.addr,
                    text: self.buffer.clone(),
                })
            }
            _ => None,
        }
    }

    /// Close the editor, committing a still-dirty buffer
    pub fn blur(self) -> Option<PendingCommit> {
        if !self.is_dirty() {
            return None;
        }
        Some(PendingCommit {
            addr: self.addr,
            text: self.buffer,
        })
    }
}
