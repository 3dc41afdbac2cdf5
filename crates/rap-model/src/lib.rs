//! RAP domain model
//!
//! The leaf crate of the planner workspace:
//! - Entity identifiers (ULID newtypes)
//! - Employees, clients, projects, allocations, memberships
//! - Targeted single-field patches
//! - The ISO week window and workday/hour primitives
//!
//! No I/O and no async here; everything is plain data that the store seams
//! and the planner build on.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod entity;
pub mod error;
pub mod hours;
pub mod ids;
pub mod patch;
pub mod week;

pub use entity::{
    Client, Employee, MemberRole, NewClient, NewProject, Project, ProjectMembership,
    ProjectStatus, ResourceAllocation,
};
pub use error::ParseError;
pub use hours::{parse_hours, DayHours, Workday};
pub use ids::{AllocationId, ClientId, EmployeeId, ProjectId};
pub use patch::{AllocationPatch, ProjectPatch};
pub use week::{step_week, WeekWindow};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
