//! Targeted single-field patches
//!
//! Every cell commit persists exactly one field, so concurrent edits to
//! different fields of the same record never clobber each other. The patch
//! carries field and value in one constructor; a mismatched pair cannot be
//! built.

use crate::entity::{Project, ProjectStatus, ResourceAllocation};
use crate::hours::Workday;
use crate::ids::EmployeeId;
use serde::{Deserialize, Serialize};

/// A single-field update to an allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum AllocationPatch {
    /// One day-hour cell
    Hours { day: Workday, hours: f64 },
    /// Free-text task description
    Task(String),
    /// Free-text comment
    Comment(String),
}

impl AllocationPatch {
    /// Hour patch, clamping negative or non-finite input to 0
    #[inline]
    #[must_use]
    pub fn hours(day: Workday, hours: f64) -> Self {
        let hours = if hours.is_finite() && hours > 0.0 {
            hours
        } else {
            0.0
        };
        Self::Hours { day, hours }
    }

    /// Field name as persisted
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            AllocationPatch::Hours { day, .. } => day.as_str(),
            AllocationPatch::Task(_) => "task",
            AllocationPatch::Comment(_) => "comment",
        }
    }

    /// Apply the patch to an in-memory allocation
    pub fn apply(&self, allocation: &mut ResourceAllocation) {
        match self {
            AllocationPatch::Hours { day, hours } => allocation.hours.set(*day, *hours),
            AllocationPatch::Task(text) => allocation.task = text.clone(),
            AllocationPatch::Comment(text) => allocation.comment = text.clone(),
        }
    }
}

/// A single-field update to a project, issued from the grid's inline editors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum ProjectPatch {
    Status(ProjectStatus),
    Manager(Option<EmployeeId>),
}

impl ProjectPatch {
    /// Field name as persisted
    #[inline]
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            ProjectPatch::Status(_) => "status",
            ProjectPatch::Manager(_) => "manager",
        }
    }

    /// Apply the patch to an in-memory project
    pub fn apply(&self, project: &mut Project) {
        match self {
            ProjectPatch::Status(status) => project.status = *status,
            ProjectPatch::Manager(manager) => project.manager = *manager,
        }
    }
}
