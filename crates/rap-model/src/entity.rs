//! Planner entities
//!
//! Employees, clients, projects, allocations, and project memberships.
//! Employees and clients are referenced, never owned, by allocations;
//! the allocation's project link is a plain `ProjectId` and may dangle
//! if the project disappears underneath it (the grid renders such rows
//! as orphaned).

use crate::error::ParseError;
use crate::hours::DayHours;
use crate::ids::{AllocationId, ClientId, EmployeeId, ProjectId};
use crate::week::WeekWindow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An employee as supplied by the roster provider
///
/// Read-only from the planner's perspective; HR flows own the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    /// Display name used for row-group ordering
    pub name: String,
    pub initials: String,
    /// Department tag used by the grid filter
    pub department: Option<String>,
    pub title: Option<String>,
}

impl Employee {
    /// Create a new employee record
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            id: EmployeeId::new(),
            name: name.into(),
            initials: initials.into(),
            department: None,
            title: None,
        }
    }

    /// With department tag
    #[inline]
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// With job title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A client organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Unique per organization by convention, not enforced
    pub name: String,
}

impl Client {
    /// Create a new client
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
        }
    }
}

/// Fixed project status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Still being quoted
    Proposal,
    /// In production
    Active,
    /// Paused by the client
    OnHold,
    /// Delivered
    Completed,
    /// Abandoned before delivery
    Cancelled,
}

impl ProjectStatus {
    /// The full vocabulary, in dropdown order
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Proposal,
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// Status name as persisted
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Proposal => "proposal",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Whether allocations against this project still make sense
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, ProjectStatus::Proposal | ProjectStatus::Active | ProjectStatus::OnHold)
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proposal" => Ok(ProjectStatus::Proposal),
            "active" => Ok(ProjectStatus::Active),
            "on-hold" | "onhold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(ParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// A project work items are allocated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    /// Human-facing job number, intended unique but not enforced
    pub job_number: Option<String>,
    pub client: Option<ClientId>,
    pub status: ProjectStatus,
    /// Project manager, editable inline from the grid
    pub manager: Option<EmployeeId>,
}

impl Project {
    /// Create a new project with default status and no links
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            title: title.into(),
            job_number: None,
            client: None,
            status: ProjectStatus::default(),
            manager: None,
        }
    }

    /// With job number
    #[inline]
    #[must_use]
    pub fn with_job_number(mut self, job_number: impl Into<String>) -> Self {
        self.job_number = Some(job_number.into());
        self
    }

    /// With client link
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// With project manager
    #[inline]
    #[must_use]
    pub fn with_manager(mut self, manager: EmployeeId) -> Self {
        self.manager = Some(manager);
        self
    }
}

/// Input for creating a client through the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
}

impl NewClient {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Input for creating a project through the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub job_number: Option<String>,
    pub client: Option<ClientId>,
    pub status: ProjectStatus,
}

impl NewProject {
    /// New project input with default status
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            job_number: None,
            client: None,
            status: ProjectStatus::default(),
        }
    }

    /// With job number (empty input means none)
    #[inline]
    #[must_use]
    pub fn with_job_number(mut self, job_number: impl Into<String>) -> Self {
        let job_number = job_number.into();
        if !job_number.is_empty() {
            self.job_number = Some(job_number);
        }
        self
    }

    /// With client link
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }
}

/// Membership role tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Regular project member
    Member,
    /// Project manager
    Manager,
}

impl MemberRole {
    /// Role name as persisted
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Manager => "manager",
        }
    }
}

impl Default for MemberRole {
    fn default() -> Self {
        MemberRole::Member
    }
}

impl FromStr for MemberRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(MemberRole::Member),
            "manager" => Ok(MemberRole::Manager),
            other => Err(ParseError::UnknownRole(other.to_string())),
        }
    }
}

/// A (project, employee) membership pair
///
/// Unique on the pair; upserting an existing pair is a no-op. This is how
/// "my projects" filtering elsewhere recognizes involvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub project: ProjectId,
    pub employee: EmployeeId,
    pub role: MemberRole,
}

impl ProjectMembership {
    /// Create a membership pair
    #[inline]
    #[must_use]
    pub fn new(project: ProjectId, employee: EmployeeId, role: MemberRole) -> Self {
        Self {
            project,
            employee,
            role,
        }
    }
}

/// One task slice of an employee's week on a project
///
/// Multiple allocations may exist for the same (employee, project, week);
/// each is a distinct slice and the system never merges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub id: AllocationId,
    pub employee: EmployeeId,
    pub project: ProjectId,
    /// ISO week-year
    pub year: i32,
    /// ISO week number, 1..=53
    pub week: u32,
    pub hours: DayHours,
    pub task: String,
    pub comment: String,
}

impl ResourceAllocation {
    /// Create a fresh allocation: zero hours, empty texts
    #[inline]
    #[must_use]
    pub fn new(employee: EmployeeId, project: ProjectId, window: WeekWindow) -> Self {
        Self {
            id: AllocationId::new(),
            employee,
            project,
            year: window.year,
            week: window.week,
            hours: DayHours::zero(),
            task: String::new(),
            comment: String::new(),
        }
    }

    /// The window this allocation belongs to
    #[inline]
    #[must_use]
    pub fn window(&self) -> WeekWindow {
        WeekWindow::new(self.year, self.week)
    }

    /// Total hours across the week
    #[inline]
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.hours.total()
    }
}
