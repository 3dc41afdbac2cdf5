//! RAP weekly planning engine
//!
//! Assembles the week grid from the store seams and drives every edit
//! surface:
//! - [`PlanningGrid`] - roster groups joined with hydrated allocation rows
//! - [`CellEditor`] - focused-cell editing with immediate or debounced
//!   commit strategies
//! - [`GhostRow`] / [`GhostResolver`] - the blank entry row that turns free
//!   text into linked or freshly created projects and clients
//! - [`MembershipSync`] - records project membership as rows are created
//! - [`PlannerEngine`] - ties it together behind a command-driven run loop
//!
//! Edits are optimistic: the local grid mutates first and store writes
//! follow. Failures surface as [`Notice`]s and a stale flag, never as a
//! rollback.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod ghost;
pub mod grid;
pub mod membership;
pub mod notice;
pub mod totals;

pub use config::PlannerConfig;
pub use editor::{
    format_hours, CellAddr, CellEditor, DebouncedCommit, EditStrategy, FieldKind, ImmediateCommit,
    PendingCommit,
};
pub use engine::{PlannerCommand, PlannerEngine};
pub use error::{ConfigError, PlannerError};
pub use ghost::{
    CommitTrigger, DisambiguationPrompt, GhostError, GhostField, GhostInput, GhostOutcome,
    GhostResolver, GhostRow, GhostState, PromptAnswer,
};
pub use grid::{
    build_grid, resolve_department, AllocationRow, DepartmentChoice, PlanningGrid, ProjectLink,
    RowGroup,
};
pub use membership::MembershipSync;
pub use notice::{Notice, NoticeLevel, NoticeLog};
pub use totals::GridTotals;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
