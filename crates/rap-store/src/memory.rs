//! In-memory store implementations
//!
//! Backing for the demo binary and the test suites. State lives in
//! concurrent maps; mutations emit [`StoreEvent`]s on a [`ChangeFeed`] that
//! can be shared across stores so one subscription covers allocation and
//! directory changes alike.

use crate::error::StoreError;
use crate::event::{ChangeFeed, StoreEvent};
use crate::traits::{AllocationStore, Directory, MembershipRegistry, ProjectHit, RosterProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use rap_model::{
    AllocationId, AllocationPatch, Client, ClientId, Employee, EmployeeId, MemberRole, NewClient,
    NewProject, Project, ProjectId, ProjectMembership, ProjectPatch, ResourceAllocation,
    WeekWindow,
};
use tokio::sync::broadcast;
use tracing::debug;

/// Allocation rows keyed by id
#[derive(Debug, Default)]
pub struct MemoryAllocationStore {
    rows: DashMap<AllocationId, ResourceAllocation>,
    feed: ChangeFeed,
}

impl MemoryAllocationStore {
    /// Create an empty store with its own change feed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a shared change feed instead of a private one
    #[must_use]
    pub fn with_feed(mut self, feed: ChangeFeed) -> Self {
        self.feed = feed;
        self
    }

    /// Insert a pre-built row without emitting a change event
    pub fn seed(&self, row: ResourceAllocation) {
        self.rows.insert(row.id, row);
    }

    /// Total row count across all weeks
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl AllocationStore for MemoryAllocationStore {
    async fn list(&self, window: WeekWindow) -> Result<Vec<ResourceAllocation>, StoreError> {
        let mut rows: Vec<ResourceAllocation> = self
            .rows
            .iter()
            .filter(|entry| entry.window() == window)
            .map(|entry| entry.value().clone())
            .collect();
        // ULID ids put rows in creation order
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn create(
        &self,
        employee: EmployeeId,
        project: ProjectId,
        window: WeekWindow,
    ) -> Result<ResourceAllocation, StoreError> {
        let row = ResourceAllocation::new(employee, project, window);
        debug!(id = %row.id, %window, "allocation created");
        self.rows.insert(row.id, row.clone());
        self.feed.emit(StoreEvent::AllocationsChanged { window });
        Ok(row)
    }

    async fn update_field(
        &self,
        id: AllocationId,
        patch: AllocationPatch,
    ) -> Result<(), StoreError> {
        let window = {
            let mut row = self
                .rows
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("allocation", id))?;
            patch.apply(row.value_mut());
            row.window()
        };
        self.feed.emit(StoreEvent::AllocationsChanged { window });
        Ok(())
    }

    async fn delete(&self, id: AllocationId) -> Result<(), StoreError> {
        let (_, row) = self
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("allocation", id))?;
        debug!(%id, "allocation deleted");
        self.feed.emit(StoreEvent::AllocationsChanged {
            window: row.window(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }
}

/// Projects and clients with substring search and exact lookup
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    projects: DashMap<ProjectId, Project>,
    clients: DashMap<ClientId, Client>,
    feed: ChangeFeed,
}

impl MemoryDirectory {
    /// Create an empty directory with its own change feed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a shared change feed instead of a private one
    #[must_use]
    pub fn with_feed(mut self, feed: ChangeFeed) -> Self {
        self.feed = feed;
        self
    }

    /// Insert a project without emitting a change event
    pub fn seed_project(&self, project: Project) {
        self.projects.insert(project.id, project);
    }

    /// Insert a client without emitting a change event
    pub fn seed_client(&self, client: Client) {
        self.clients.insert(client.id, client);
    }

    /// Number of projects
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of clients
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn client_name(&self, id: Option<ClientId>) -> Option<String> {
        id.and_then(|id| self.clients.get(&id).map(|entry| entry.name.clone()))
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn search_projects(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ProjectHit>, StoreError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<ProjectHit> = self
            .projects
            .iter()
            .filter_map(|entry| {
                let project = entry.value();
                let client_name = self.client_name(project.client);
                let matched = project.title.to_lowercase().contains(&needle)
                    || project
                        .job_number
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                    || client_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle));
                matched.then(|| ProjectHit {
                    project: project.clone(),
                    client_name,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.project
                .title
                .cmp(&b.project.title)
                .then_with(|| a.project.id.cmp(&b.project.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn search_clients(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Client>, StoreError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<Client> = self
            .clients
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .map(|entry| entry.value().clone())
            .collect();

        hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn find_project_by_job_number(
        &self,
        job_number: &str,
    ) -> Result<Option<Project>, StoreError> {
        let wanted = job_number.trim();
        if wanted.is_empty() {
            return Ok(None);
        }
        // Job numbers compare case-sensitively
        Ok(self
            .projects
            .iter()
            .find(|entry| entry.job_number.as_deref() == Some(wanted))
            .map(|entry| entry.value().clone()))
    }

    async fn find_project_by_title(&self, title: &str) -> Result<Option<Project>, StoreError> {
        let wanted = title.trim();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .projects
            .iter()
            .find(|entry| entry.title.eq_ignore_ascii_case(wanted))
            .map(|entry| entry.value().clone()))
    }

    async fn find_client_by_name(&self, name: &str) -> Result<Option<Client>, StoreError> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .clients
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
            .map(|entry| entry.value().clone()))
    }

    async fn create_project(&self, input: NewProject) -> Result<Project, StoreError> {
        let mut project = Project::new(input.title).with_status(input.status);
        if let Some(job_number) = input.job_number {
            project = project.with_job_number(job_number);
        }
        if let Some(client) = input.client {
            project = project.with_client(client);
        }
        debug!(id = %project.id, title = %project.title, "project created");
        self.projects.insert(project.id, project.clone());
        self.feed.emit(StoreEvent::DirectoryChanged);
        Ok(project)
    }

    async fn create_client(&self, input: NewClient) -> Result<Client, StoreError> {
        let client = Client::new(input.name);
        debug!(id = %client.id, name = %client.name, "client created");
        self.clients.insert(client.id, client.clone());
        self.feed.emit(StoreEvent::DirectoryChanged);
        Ok(client)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<(), StoreError> {
        {
            let mut project = self
                .projects
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("project", id))?;
            patch.apply(project.value_mut());
        }
        self.feed.emit(StoreEvent::DirectoryChanged);
        Ok(())
    }

    async fn fetch_projects(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.projects.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn fetch_clients(&self, ids: &[ClientId]) -> Result<Vec<Client>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.clients.get(id).map(|entry| entry.value().clone()))
            .collect())
    }
}

/// Membership pairs keyed by (project, employee)
#[derive(Debug, Default)]
pub struct MemoryMembershipRegistry {
    rows: DashMap<(ProjectId, EmployeeId), ProjectMembership>,
}

impl MemoryMembershipRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pair is registered
    #[must_use]
    pub fn contains(&self, project: ProjectId, employee: EmployeeId) -> bool {
        self.rows.contains_key(&(project, employee))
    }

    /// Total membership count
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl MembershipRegistry for MemoryMembershipRegistry {
    async fn upsert(
        &self,
        project: ProjectId,
        employee: EmployeeId,
        role: MemberRole,
    ) -> Result<(), StoreError> {
        // Existing pairs keep their original role
        self.rows
            .entry((project, employee))
            .or_insert_with(|| ProjectMembership::new(project, employee, role));
        Ok(())
    }

    async fn members(&self, project: ProjectId) -> Result<Vec<ProjectMembership>, StoreError> {
        let mut rows: Vec<ProjectMembership> = self
            .rows
            .iter()
            .filter(|entry| entry.project == project)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|membership| membership.employee);
        Ok(rows)
    }
}

/// Fixed employee roster with derived department options
#[derive(Debug)]
pub struct MemoryRoster {
    employees: RwLock<Vec<Employee>>,
    departments: RwLock<Vec<String>>,
}

impl MemoryRoster {
    /// Build from an employee list, collecting the distinct department tags
    /// in list order as the filter options
    #[must_use]
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut departments: Vec<String> = Vec::new();
        for employee in &employees {
            if let Some(department) = &employee.department {
                if !departments.iter().any(|d| d == department) {
                    departments.push(department.clone());
                }
            }
        }
        Self {
            employees: RwLock::new(employees),
            departments: RwLock::new(departments),
        }
    }

    /// Override the derived department options
    #[must_use]
    pub fn with_departments(self, departments: Vec<String>) -> Self {
        *self.departments.write() = departments;
        self
    }

    /// Swap in a new employee list, picked up on the next refresh
    pub fn set_employees(&self, employees: Vec<Employee>) {
        *self.employees.write() = employees;
    }
}

#[async_trait]
impl RosterProvider for MemoryRoster {
    async fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.employees.read().clone())
    }

    async fn departments(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.departments.read().clone())
    }
}
