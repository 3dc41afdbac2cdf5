//! Planning grid assembly
//!
//! Joins the roster against one week of allocations and hydrates each row
//! with its project and client. Every employee in the active department
//! appears as a group, with or without rows, so the ghost row always has
//! somewhere to live.

use crate::totals::GridTotals;
use indexmap::IndexMap;
use rap_model::{
    AllocationId, Client, ClientId, Employee, EmployeeId, Project, ProjectId, ResourceAllocation,
    WeekWindow,
};
use serde::Serialize;

/// How a row relates to the project directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProjectLink {
    /// Project found, client attached when the project names one
    Resolved {
        /// The hydrated project
        project: Project,
        /// The project's client, if any
        client: Option<Client>,
    },
    /// Allocation references a project the directory no longer returns
    Orphaned {
        /// The dangling reference
        project: ProjectId,
    },
}

impl ProjectLink {
    /// Display title; orphans get a placeholder
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Resolved { project, .. } => &project.title,
            Self::Orphaned { .. } => "(unknown project)",
        }
    }

    /// Client name for the client column
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        match self {
            Self::Resolved { client, .. } => client.as_ref().map(|c| c.name.as_str()),
            Self::Orphaned { .. } => None,
        }
    }

    /// The referenced project id, resolved or not
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Resolved { project, .. } => project.id,
            Self::Orphaned { project } => *project,
        }
    }

    /// Whether the directory lookup failed
    #[inline]
    #[must_use]
    pub fn is_orphaned(&self) -> bool {
        matches!(self, Self::Orphaned { .. })
    }
}

/// One allocation row with its hydrated project link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRow {
    /// The allocation itself
    pub allocation: ResourceAllocation,
    /// Project and client hydration
    pub link: ProjectLink,
}

impl AllocationRow {
    /// Row id shorthand
    #[inline]
    #[must_use]
    pub fn id(&self) -> AllocationId {
        self.allocation.id
    }
}

/// All of one employee's rows for the week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGroup {
    /// The employee heading the group
    pub employee: Employee,
    /// Rows in creation order
    pub rows: Vec<AllocationRow>,
}

impl RowGroup {
    /// Group subtotals
    #[must_use]
    pub fn totals(&self) -> GridTotals {
        GridTotals::of(self.rows.iter().map(|row| &row.allocation))
    }
}

/// The assembled week view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningGrid {
    /// The week on display
    pub window: WeekWindow,
    /// Active department filter, none for the whole roster
    pub department: Option<String>,
    /// Employee groups sorted by name
    pub groups: Vec<RowGroup>,
}

impl PlanningGrid {
    /// An empty grid for a window
    #[must_use]
    pub fn empty(window: WeekWindow) -> Self {
        Self {
            window,
            department: None,
            groups: Vec::new(),
        }
    }

    /// Grid-wide totals, including optimistic local edits
    #[must_use]
    pub fn totals(&self) -> GridTotals {
        GridTotals::of(
            self.groups
                .iter()
                .flat_map(|group| group.rows.iter().map(|row| &row.allocation)),
        )
    }

    /// Find a row by allocation id
    #[must_use]
    pub fn row(&self, id: AllocationId) -> Option<&AllocationRow> {
        self.groups
            .iter()
            .flat_map(|group| group.rows.iter())
            .find(|row| row.id() == id)
    }

    /// Find a row mutably
    pub fn row_mut(&mut self, id: AllocationId) -> Option<&mut AllocationRow> {
        self.groups
            .iter_mut()
            .flat_map(|group| group.rows.iter_mut())
            .find(|row| row.id() == id)
    }

    /// Drop a row, returning whether it was present
    pub fn remove_row(&mut self, id: AllocationId) -> bool {
        for group in &mut self.groups {
            if let Some(index) = group.rows.iter().position(|row| row.id() == id) {
                group.rows.remove(index);
                return true;
            }
        }
        false
    }

    /// Append a freshly created row under its employee's group
    ///
    /// Rows land at the end of the group, which is where creation-order
    /// sorting puts them on the next refresh anyway.
    pub fn push_row(&mut self, row: AllocationRow) -> bool {
        let employee = row.allocation.employee;
        match self
            .groups
            .iter_mut()
            .find(|group| group.employee.id == employee)
        {
            Some(group) => {
                group.rows.push(row);
                true
            }
            None => false,
        }
    }

    /// Total row count across groups
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|group| group.rows.len()).sum()
    }

    /// Whether any group holds rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// The user's department filter selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentChoice {
    /// No explicit choice yet; the default rule applies
    #[default]
    Unset,
    /// Explicitly show the whole roster
    All,
    /// Explicitly show one department
    Only(String),
}

/// Pick the active department: an explicit choice wins; otherwise the home
/// department when the options list carries it, then the first option
#[must_use]
pub fn resolve_department(
    choice: &DepartmentChoice,
    home: Option<&str>,
    options: &[String],
) -> Option<String> {
    match choice {
        DepartmentChoice::All => None,
        DepartmentChoice::Only(department) => Some(department.clone()),
        DepartmentChoice::Unset => {
            if let Some(home) = home {
                if options.iter().any(|option| option == home) {
                    return Some(home.to_string());
                }
            }
            options.first().cloned()
        }
    }
}

/// Assemble the grid for one week
///
/// Employees outside the department filter are skipped, as are allocations
/// whose employee is not on the roster. A missing project becomes an
/// [`ProjectLink::Orphaned`] row that stays hour-editable.
#[must_use]
pub fn build_grid(
    window: WeekWindow,
    department: Option<String>,
    employees: &[Employee],
    allocations: Vec<ResourceAllocation>,
    projects: &IndexMap<ProjectId, Project>,
    clients: &IndexMap<ClientId, Client>,
) -> PlanningGrid {
    let mut by_employee: IndexMap<EmployeeId, Vec<AllocationRow>> = IndexMap::new();
    for allocation in allocations {
        let link = match projects.get(&allocation.project) {
            Some(project) => ProjectLink::Resolved {
                client: project.client.and_then(|id| clients.get(&id).cloned()),
                project: project.clone(),
            },
            None => ProjectLink::Orphaned {
                project: allocation.project,
            },
        };
        by_employee
            .entry(allocation.employee)
            .or_default()
            .push(AllocationRow { allocation, link });
    }

    let mut groups: Vec<RowGroup> = employees
        .iter()
        .filter(|employee| match &department {
            Some(filter) => employee.department.as_deref() == Some(filter.as_str()),
            None => true,
        })
        .map(|employee| {
            let mut rows = by_employee.shift_remove(&employee.id).unwrap_or_default();
            rows.sort_by_key(AllocationRow::id);
            RowGroup {
                employee: employee.clone(),
                rows,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.employee.name.cmp(&b.employee.name));

    PlanningGrid {
        window,
        department,
        groups,
    }
}
