//! Membership synchronization
//!
//! Whenever the grid creates an allocation, the (project, employee) pair is
//! upserted into the membership registry so downstream tooling sees the
//! assignment. Registry failures degrade to a warning; they never roll back
//! the allocation.

use crate::notice::Notice;
use rap_model::{EmployeeId, MemberRole, ProjectId};
use rap_store::MembershipRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keeps the membership registry in step with allocation creation
#[derive(Clone)]
pub struct MembershipSync {
    registry: Arc<dyn MembershipRegistry>,
    default_role: MemberRole,
}

impl MembershipSync {
    /// Create a synchronizer recording memberships with `default_role`
    #[must_use]
    pub fn new(registry: Arc<dyn MembershipRegistry>, default_role: MemberRole) -> Self {
        Self {
            registry,
            default_role,
        }
    }

    /// Record that an employee now has allocation on a project
    ///
    /// Idempotent through the registry's upsert. Returns a notice instead
    /// of an error when the registry is unavailable.
    pub async fn ensure(&self, project: ProjectId, employee: EmployeeId) -> Option<Notice> {
        match self
            .registry
            .upsert(project, employee, self.default_role)
            .await
        {
            Ok(()) => {
                debug!(%project, %employee, "membership recorded");
                None
            }
            Err(error) => {
                warn!(%project, %employee, %error, "membership upsert failed");
                Some(Notice::warning(format!(
                    "couldn't record project membership: {error}"
                )))
            }
        }
    }
}

impl std::fmt::Debug for MembershipSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipSync")
            .field("default_role", &self.default_role)
            .finish_non_exhaustive()
    }
}
