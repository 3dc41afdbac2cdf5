//! Testing utilities for the RAP workspace
//!
//! Shared fixtures: a small studio roster, seeded in-memory stores wired to
//! one change feed, and allocation builders.

#![allow(missing_docs)]

use rap_model::{
    Client, Employee, EmployeeId, Project, ProjectId, ResourceAllocation, WeekWindow, Workday,
};
use rap_store::{
    ChangeFeed, MemoryAllocationStore, MemoryDirectory, MemoryMembershipRegistry, MemoryRoster,
};
use std::sync::Arc;

/// A planning week in the middle of a normal 52-week year
pub fn fixture_week() -> WeekWindow {
    WeekWindow::new(2025, 12)
}

/// Four employees across two departments plus one untagged contractor
pub fn studio_employees() -> Vec<Employee> {
    vec![
        Employee::new("Rita Vargas", "RV")
            .with_department("Design")
            .with_title("Senior Designer"),
        Employee::new("Omar Ba", "OB")
            .with_department("Engineering")
            .with_title("Backend Engineer"),
        Employee::new("Lena Fischer", "LF").with_department("Design"),
        Employee::new("Theo Park", "TP"),
    ]
}

/// An allocation with a given Monday-to-Friday hour pattern
pub fn allocation_with_hours(
    employee: EmployeeId,
    project: ProjectId,
    window: WeekWindow,
    hours: [f64; 5],
) -> ResourceAllocation {
    let mut row = ResourceAllocation::new(employee, project, window);
    for (day, value) in Workday::ALL.into_iter().zip(hours) {
        row.hours.set(day, value);
    }
    row
}

/// All four collaborators seeded with a known roster and directory,
/// sharing a single change feed
pub struct PlannerFixture {
    pub feed: ChangeFeed,
    pub allocations: Arc<MemoryAllocationStore>,
    pub directory: Arc<MemoryDirectory>,
    pub memberships: Arc<MemoryMembershipRegistry>,
    pub roster: Arc<MemoryRoster>,
    pub employees: Vec<Employee>,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
}

impl PlannerFixture {
    /// Empty stores, empty roster
    pub fn empty() -> Self {
        let feed = ChangeFeed::default();
        Self {
            allocations: Arc::new(MemoryAllocationStore::new().with_feed(feed.clone())),
            directory: Arc::new(MemoryDirectory::new().with_feed(feed.clone())),
            memberships: Arc::new(MemoryMembershipRegistry::new()),
            roster: Arc::new(MemoryRoster::new(Vec::new())),
            feed,
            employees: Vec::new(),
            clients: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// Studio roster, two clients, three projects (one without a client)
    pub fn seeded() -> Self {
        let mut fixture = Self::empty();

        let employees = studio_employees();
        fixture.roster = Arc::new(MemoryRoster::new(employees.clone()));
        fixture.employees = employees;

        let acme = Client::new("Acme Corp");
        let northwind = Client::new("Northwind Ltd");
        fixture.directory.seed_client(acme.clone());
        fixture.directory.seed_client(northwind.clone());

        let website = Project::new("Website Redesign")
            .with_job_number("24-031")
            .with_client(acme.id);
        let migration = Project::new("Backend Migration")
            .with_job_number("24-007")
            .with_client(northwind.id);
        let internal = Project::new("Internal Tooling");
        fixture.directory.seed_project(website.clone());
        fixture.directory.seed_project(migration.clone());
        fixture.directory.seed_project(internal.clone());

        fixture.clients = vec![acme, northwind];
        fixture.projects = vec![website, migration, internal];
        fixture
    }

    /// Look up a seeded employee by initials
    pub fn employee(&self, initials: &str) -> &Employee {
        self.employees
            .iter()
            .find(|e| e.initials == initials)
            .unwrap()
    }

    /// Look up a seeded project by title
    pub fn project(&self, title: &str) -> &Project {
        self.projects.iter().find(|p| p.title == title).unwrap()
    }

    /// Look up a seeded client by name
    pub fn client(&self, name: &str) -> &Client {
        self.clients.iter().find(|c| c.name == name).unwrap()
    }
}
