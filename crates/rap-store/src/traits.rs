//! Collaborator traits
//!
//! The planner's only view of the surrounding application. All traits are
//! object-safe so the engine can hold `Arc<dyn ...>` seams and tests can
//! substitute doubles.

use crate::error::StoreError;
use crate::event::StoreEvent;
use async_trait::async_trait;
use rap_model::{
    AllocationId, AllocationPatch, Client, ClientId, Employee, EmployeeId, MemberRole, NewClient,
    NewProject, Project, ProjectId, ProjectMembership, ProjectPatch, ResourceAllocation,
    WeekWindow,
};
use tokio::sync::broadcast;

/// Allocation persistence for a week window
#[async_trait]
pub trait AllocationStore: Send + Sync {
    /// All allocations in the window, in creation order
    async fn list(&self, window: WeekWindow) -> Result<Vec<ResourceAllocation>, StoreError>;

    /// Create a fresh allocation: zero hours, empty task/comment
    async fn create(
        &self,
        employee: EmployeeId,
        project: ProjectId,
        window: WeekWindow,
    ) -> Result<ResourceAllocation, StoreError>;

    /// Persist a targeted single-field update
    ///
    /// Concurrent edits to different fields of the same allocation never
    /// clobber each other; the same field is last-write-wins.
    async fn update_field(
        &self,
        id: AllocationId,
        patch: AllocationPatch,
    ) -> Result<(), StoreError>;

    /// Delete one allocation; no cascading side effects
    async fn delete(&self, id: AllocationId) -> Result<(), StoreError>;

    /// Open a change-notification subscription (drop to unsubscribe)
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// A project search hit with its client's name for dropdown display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHit {
    pub project: Project,
    pub client_name: Option<String>,
}

impl ProjectHit {
    /// Dropdown label: "title (client)" or just the title
    #[must_use]
    pub fn label(&self) -> String {
        match &self.client_name {
            Some(client) => format!("{} ({})", self.project.title, client),
            None => self.project.title.clone(),
        }
    }
}

/// Project/client directory: search, exact lookup, creation, inline edits
#[async_trait]
pub trait Directory: Send + Sync {
    /// Case-insensitive substring search over title, job number, and client
    /// name, capped at `limit` hits
    async fn search_projects(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ProjectHit>, StoreError>;

    /// Case-insensitive substring search over client names, capped at `limit`
    async fn search_clients(&self, query: &str, limit: usize)
        -> Result<Vec<Client>, StoreError>;

    /// Exact job-number lookup
    async fn find_project_by_job_number(
        &self,
        job_number: &str,
    ) -> Result<Option<Project>, StoreError>;

    /// Exact title lookup, case-insensitive
    async fn find_project_by_title(&self, title: &str) -> Result<Option<Project>, StoreError>;

    /// Exact client-name lookup, case-insensitive
    async fn find_client_by_name(&self, name: &str) -> Result<Option<Client>, StoreError>;

    /// Create a project
    ///
    /// Duplicate detection is the caller's best-effort exact-match lookup;
    /// two racing creates may produce two projects with the same title.
    async fn create_project(&self, input: NewProject) -> Result<Project, StoreError>;

    /// Create a client
    async fn create_client(&self, input: NewClient) -> Result<Client, StoreError>;

    /// Persist a targeted single-field project update (grid inline edits)
    async fn update_project(&self, id: ProjectId, patch: ProjectPatch)
        -> Result<(), StoreError>;

    /// Bulk-fetch projects for grid hydration; missing ids are skipped
    async fn fetch_projects(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError>;

    /// Bulk-fetch clients for grid hydration; missing ids are skipped
    async fn fetch_clients(&self, ids: &[ClientId]) -> Result<Vec<Client>, StoreError>;
}

/// Project membership registry, unique on the (project, employee) pair
#[async_trait]
pub trait MembershipRegistry: Send + Sync {
    /// Idempotent upsert; re-adding an existing pair is a no-op
    async fn upsert(
        &self,
        project: ProjectId,
        employee: EmployeeId,
        role: MemberRole,
    ) -> Result<(), StoreError>;

    /// Members of a project
    async fn members(&self, project: ProjectId) -> Result<Vec<ProjectMembership>, StoreError>;
}

/// Read-only employee roster and department filter options
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// The full employee list with department tags
    async fn employees(&self) -> Result<Vec<Employee>, StoreError>;

    /// Department filter options, in display order
    async fn departments(&self) -> Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_hit_label() {
        let hit = ProjectHit {
            project: Project::new("Website"),
            client_name: Some("Acme".to_string()),
        };
        assert_eq!(hit.label(), "Website (Acme)");

        let bare = ProjectHit {
            project: Project::new("Internal tooling"),
            client_name: None,
        };
        assert_eq!(bare.label(), "Internal tooling");
    }
}
