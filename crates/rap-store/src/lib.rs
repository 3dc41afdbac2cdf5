//! RAP collaborator seams
//!
//! The planner talks to the rest of the system only through the traits in
//! this crate:
//! - [`AllocationStore`] - fetch/create/patch/delete week allocations, plus
//!   a change-notification feed
//! - [`Directory`] - project/client search, exact lookups, and creation
//! - [`MembershipRegistry`] - idempotent (project, employee) upserts
//! - [`RosterProvider`] - employees and department filter options
//!
//! The `memory` module ships complete in-memory implementations backing the
//! test suites and the demo binary. Real deployments substitute their own
//! data-access layer behind the same traits.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod event;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use event::{ChangeFeed, StoreEvent};
pub use memory::{
    MemoryAllocationStore, MemoryDirectory, MemoryMembershipRegistry, MemoryRoster,
};
pub use traits::{AllocationStore, Directory, MembershipRegistry, ProjectHit, RosterProvider};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
