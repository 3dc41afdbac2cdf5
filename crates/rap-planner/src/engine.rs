//! Planner engine
//!
//! Owns the week window, the assembled grid, the focused cell editor, and
//! the per-employee ghost rows. Edits apply optimistically: the grid
//! mutates first and the store write follows. A failed write flags the
//! view stale and queues a notice; the next refresh reconciles against the
//! store instead of rolling anything back.

use crate::config::PlannerConfig;
use crate::editor::{
    CellAddr, CellEditor, DebouncedCommit, EditStrategy, ImmediateCommit, PendingCommit,
};
use crate::error::PlannerError;
use crate::ghost::{
    CommitTrigger, DisambiguationPrompt, GhostError, GhostField, GhostOutcome, GhostResolver,
    GhostRow, PromptAnswer,
};
use crate::grid::{
    build_grid, resolve_department, AllocationRow, DepartmentChoice, PlanningGrid, ProjectLink,
};
use crate::membership::MembershipSync;
use crate::notice::{Notice, NoticeLog};
use crate::totals::GridTotals;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rap_model::{
    step_week, AllocationId, Client, ClientId, EmployeeId, Project, ProjectId, ProjectPatch,
    ProjectStatus, WeekWindow,
};
use rap_store::{
    AllocationStore, Directory, MembershipRegistry, ProjectHit, RosterProvider, StoreError,
    StoreEvent,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Commands a UI task sends into the run loop
#[derive(Debug)]
pub enum PlannerCommand {
    /// Focus a cell, flushing the previously focused one
    Focus(CellAddr),
    /// One input revision for the focused cell
    Input(String),
    /// Focus left the focused cell
    Blur,
    /// Delete one allocation row
    DeleteRow(AllocationId),
    /// Move the window by whole weeks
    StepWeek(i64),
    /// Show the week containing a date
    JumpTo(NaiveDate),
    /// Change the department filter
    SetDepartment(DepartmentChoice),
    /// Text typed into a ghost cell
    GhostInput {
        /// Whose ghost row
        employee: EmployeeId,
        /// Which cell
        field: GhostField,
        /// The new text
        text: String,
    },
    /// A commit gesture on a ghost row
    GhostCommit {
        /// Whose ghost row
        employee: EmployeeId,
        /// The gesture
        trigger: CommitTrigger,
    },
    /// Answer to an open disambiguation prompt
    GhostAnswer {
        /// Whose ghost row
        employee: EmployeeId,
        /// The supplied details
        answer: PromptAnswer,
    },
    /// Inline status edit on a project
    SetProjectStatus {
        /// The project
        project: ProjectId,
        /// New status
        status: ProjectStatus,
    },
    /// Inline manager edit on a project
    SetProjectManager {
        /// The project
        project: ProjectId,
        /// New manager, none to clear
        manager: Option<EmployeeId>,
    },
    /// Stop the run loop
    Shutdown,
}

/// The planner session
pub struct PlannerEngine {
    config: PlannerConfig,
    allocations: Arc<dyn AllocationStore>,
    directory: Arc<dyn Directory>,
    roster: Arc<dyn RosterProvider>,
    membership: MembershipSync,
    resolver: GhostResolver,
    immediate: Arc<dyn EditStrategy>,
    debounced: Arc<dyn EditStrategy>,
    window: WeekWindow,
    department: DepartmentChoice,
    departments: Vec<String>,
    grid: PlanningGrid,
    editor: Option<CellEditor>,
    ghosts: HashMap<EmployeeId, GhostRow>,
    notices: NoticeLog,
    stale: bool,
}

impl PlannerEngine {
    /// Create an engine over the four collaborators, showing `window`
    ///
    /// The grid starts empty; call [`refresh`](Self::refresh) (or hand the
    /// engine to [`run`](Self::run)) to load it.
    #[must_use]
    pub fn new(
        config: PlannerConfig,
        allocations: Arc<dyn AllocationStore>,
        directory: Arc<dyn Directory>,
        memberships: Arc<dyn MembershipRegistry>,
        roster: Arc<dyn RosterProvider>,
        window: WeekWindow,
    ) -> Self {
        let membership = MembershipSync::new(memberships, config.default_role);
        let resolver = GhostResolver::new(directory.clone(), allocations.clone(), &config);
        Self {
            immediate: Arc::new(ImmediateCommit),
            debounced: Arc::new(DebouncedCommit::new(config.debounce())),
            notices: NoticeLog::new(config.max_notices),
            grid: PlanningGrid::empty(window),
            membership,
            resolver,
            config,
            allocations,
            directory,
            roster,
            window,
            department: DepartmentChoice::Unset,
            departments: Vec::new(),
            editor: None,
            ghosts: HashMap::new(),
            stale: false,
        }
    }

    /// The week on display
    #[inline]
    #[must_use]
    pub fn window(&self) -> WeekWindow {
        self.window
    }

    /// The assembled grid
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &PlanningGrid {
        &self.grid
    }

    /// Grid-wide totals
    #[inline]
    #[must_use]
    pub fn totals(&self) -> GridTotals {
        self.grid.totals()
    }

    /// Department filter options from the roster
    #[inline]
    #[must_use]
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// Whether a store write failed since the last successful refresh
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The focused cell, if any
    #[must_use]
    pub fn focused(&self) -> Option<CellAddr> {
        self.editor.as_ref().map(CellEditor::addr)
    }

    /// The focused cell's local buffer
    #[must_use]
    pub fn buffer(&self) -> Option<&str> {
        self.editor.as_ref().map(CellEditor::buffer)
    }

    /// Take every queued notice, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Open a store change subscription
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.allocations.subscribe()
    }

    /// Reload roster, allocations, and hydration for the current window
    ///
    /// The focused cell's buffer survives; remote values never clobber
    /// text the user is still typing.
    pub async fn refresh(&mut self) -> Result<(), PlannerError> {
        let (employees, departments, rows) = futures::try_join!(
            self.roster.employees(),
            self.roster.departments(),
            self.allocations.list(self.window),
        )?;

        let mut project_ids: Vec<ProjectId> = rows.iter().map(|row| row.project).collect();
        project_ids.sort_unstable();
        project_ids.dedup();
        let projects: IndexMap<ProjectId, Project> = self
            .directory
            .fetch_projects(&project_ids)
            .await?
            .into_iter()
            .map(|project| (project.id, project))
            .collect();

        let mut client_ids: Vec<ClientId> =
            projects.values().filter_map(|project| project.client).collect();
        client_ids.sort_unstable();
        client_ids.dedup();
        let clients: IndexMap<ClientId, Client> = self
            .directory
            .fetch_clients(&client_ids)
            .await?
            .into_iter()
            .map(|client| (client.id, client))
            .collect();

        let department = resolve_department(
            &self.department,
            self.config.home_department.as_deref(),
            &departments,
        );

        self.grid = build_grid(self.window, department, &employees, rows, &projects, &clients);
        self.departments = departments;
        self.stale = false;

        if let Some(editor) = &self.editor {
            if self.grid.row(editor.addr().allocation).is_none() {
                self.editor = None;
            }
        }
        let shown: HashSet<EmployeeId> = self
            .grid
            .groups
            .iter()
            .map(|group| group.employee.id)
            .collect();
        self.ghosts.retain(|employee, _| shown.contains(employee));

        debug!(window = %self.window, rows = self.grid.row_count(), "grid refreshed");
        Ok(())
    }

    /// Move the window by whole weeks and reload
    pub async fn step_week(&mut self, delta: i64) -> Result<(), PlannerError> {
        self.blur().await;
        let monday = self
            .window
            .monday()
            .ok_or(PlannerError::InvalidWindow(self.window))?;
        self.window = WeekWindow::for_date(step_week(monday, delta));
        info!(window = %self.window, "week changed");
        self.refresh().await
    }

    /// Show the week containing `date` and reload
    pub async fn jump_to(&mut self, date: NaiveDate) -> Result<(), PlannerError> {
        self.blur().await;
        self.window = WeekWindow::for_date(date);
        info!(window = %self.window, "week changed");
        self.refresh().await
    }

    /// Change the department filter and reload
    pub async fn set_department(&mut self, choice: DepartmentChoice) -> Result<(), PlannerError> {
        self.blur().await;
        self.department = choice;
        self.refresh().await
    }

    /// Focus a cell, flushing the previously focused one
    pub async fn focus(&mut self, addr: CellAddr) -> Result<(), PlannerError> {
        self.blur().await;
        let row = self
            .grid
            .row(addr.allocation)
            .ok_or(PlannerError::UnknownRow(addr.allocation))?;
        let current = addr.field.text_of(&row.allocation);
        let strategy = if addr.field.is_numeric() {
            self.immediate.clone()
        } else {
            self.debounced.clone()
        };
        debug!(
            field = addr.field.name(),
            strategy = strategy.name(),
            "cell focused"
        );
        self.editor = Some(CellEditor::open(addr, strategy, current));
        Ok(())
    }

    /// Feed one input revision to the focused cell
    pub fn input(&mut self, text: impl Into<String>, now: Instant) -> Result<(), PlannerError> {
        match self.editor.as_mut() {
            Some(editor) => {
                editor.input(text, now);
                Ok(())
            }
            None => Err(PlannerError::NoFocusedCell),
        }
    }

    /// Unfocus, committing a still-dirty buffer
    pub async fn blur(&mut self) {
        if let Some(editor) = self.editor.take() {
            if let Some(commit) = editor.blur() {
                self.apply_commit(commit).await;
            }
        }
    }

    /// Fire the debounce timer if it is due
    pub async fn tick(&mut self, now: Instant) {
        let commit = self.editor.as_mut().and_then(|editor| editor.poll(now));
        if let Some(commit) = commit {
            self.apply_commit(commit).await;
        }
    }

    /// The armed debounce deadline, if any
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.editor.as_ref().and_then(CellEditor::deadline)
    }

    /// Delete one allocation row
    ///
    /// Only the addressed row goes; sibling rows for the same employee and
    /// project are untouched.
    pub async fn delete_row(&mut self, id: AllocationId) -> Result<(), PlannerError> {
        if self
            .editor
            .as_ref()
            .is_some_and(|editor| editor.addr().allocation == id)
        {
            self.editor = None;
        }
        if !self.grid.remove_row(id) {
            return Err(PlannerError::UnknownRow(id));
        }
        info!(%id, "row deleted");
        match self.allocations.delete(id).await {
            Ok(()) => {}
            // Already gone remotely; the grids agree
            Err(StoreError::NotFound { .. }) => {}
            Err(error) => {
                warn!(%error, "delete failed, flagging view stale");
                self.stale = true;
                self.notices
                    .push(Notice::warning(format!("couldn't delete row: {error}")));
            }
        }
        Ok(())
    }

    /// Text typed into a ghost cell
    pub fn ghost_input(
        &mut self,
        employee: EmployeeId,
        field: GhostField,
        text: impl Into<String>,
    ) -> Result<(), PlannerError> {
        self.ghost_mut(employee).set_field(field, text)?;
        Ok(())
    }

    /// A ghost row's current state, if one was touched
    #[must_use]
    pub fn ghost(&self, employee: EmployeeId) -> Option<&GhostRow> {
        self.ghosts.get(&employee)
    }

    /// The open disambiguation prompt for an employee's ghost row
    #[must_use]
    pub fn ghost_prompt(&self, employee: EmployeeId) -> Option<&DisambiguationPrompt> {
        self.ghosts.get(&employee).and_then(GhostRow::prompt)
    }

    /// Project typeahead for a ghost title cell
    pub async fn ghost_suggestions(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<ProjectHit>, PlannerError> {
        let query = self
            .ghosts
            .get(&employee)
            .map(|ghost| ghost.input().title.clone())
            .unwrap_or_default();
        self.resolver.suggest_projects(&query).await
    }

    /// Client typeahead for a ghost client cell
    pub async fn ghost_client_suggestions(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<Client>, PlannerError> {
        let query = self
            .ghosts
            .get(&employee)
            .map(|ghost| ghost.input().client.clone())
            .unwrap_or_default();
        self.resolver.suggest_clients(&query).await
    }

    /// Link a ghost row straight to a picked suggestion
    pub async fn ghost_pick(
        &mut self,
        employee: EmployeeId,
        project: &Project,
    ) -> Result<GhostOutcome, PlannerError> {
        let window = self.window;
        let row = self
            .ghosts
            .entry(employee)
            .or_insert_with(|| GhostRow::new(employee));
        let outcome = self.resolver.link_suggestion(row, project, window).await?;
        self.finish_ghost(&outcome).await;
        Ok(outcome)
    }

    /// Run the resolution ladder for a ghost commit gesture
    pub async fn ghost_commit(
        &mut self,
        employee: EmployeeId,
        trigger: CommitTrigger,
    ) -> Result<GhostOutcome, PlannerError> {
        let window = self.window;
        let row = self
            .ghosts
            .entry(employee)
            .or_insert_with(|| GhostRow::new(employee));
        let outcome = self.resolver.resolve(row, trigger, window).await?;
        self.finish_ghost(&outcome).await;
        Ok(outcome)
    }

    /// Answer an open disambiguation prompt
    pub async fn ghost_answer(
        &mut self,
        employee: EmployeeId,
        answer: PromptAnswer,
    ) -> Result<GhostOutcome, PlannerError> {
        let window = self.window;
        let row = self
            .ghosts
            .get_mut(&employee)
            .ok_or(PlannerError::Ghost(GhostError::NoPromptOpen))?;
        let outcome = self.resolver.answer(row, answer, window).await?;
        self.finish_ghost(&outcome).await;
        Ok(outcome)
    }

    /// Dismiss an open prompt, discarding the typed text
    pub fn ghost_cancel(&mut self, employee: EmployeeId) -> Result<(), PlannerError> {
        let row = self
            .ghosts
            .get_mut(&employee)
            .ok_or(PlannerError::Ghost(GhostError::NoPromptOpen))?;
        self.resolver.cancel_prompt(row)
    }

    /// Inline status edit on a project
    pub async fn set_project_status(&mut self, project: ProjectId, status: ProjectStatus) {
        self.patch_project(project, ProjectPatch::Status(status)).await;
    }

    /// Inline manager edit on a project
    pub async fn set_project_manager(
        &mut self,
        project: ProjectId,
        manager: Option<EmployeeId>,
    ) {
        self.patch_project(project, ProjectPatch::Manager(manager)).await;
    }

    /// Refresh when a change event concerns the current view
    pub async fn handle_event(&mut self, event: StoreEvent) -> Result<(), PlannerError> {
        if event.touches(self.window) {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    /// Event-driven session loop
    ///
    /// Serves UI commands, store change events, and the debounce timer
    /// until the command channel closes or [`PlannerCommand::Shutdown`]
    /// arrives. Command failures become notices; only channel closure ends
    /// the loop. Returns the engine so callers can inspect final state.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlannerCommand>,
    ) -> Result<Self, PlannerError> {
        let mut events = self.subscribe();
        self.refresh().await?;
        info!(window = %self.window, "planner loop started");

        loop {
            let deadline = self.next_deadline();
            let timer = deadline.map(tokio::time::Instant::from_std);

            tokio::select! {
                // UI command
                command = commands.recv() => {
                    match command {
                        None | Some(PlannerCommand::Shutdown) => break,
                        Some(command) => {
                            if let Err(error) = self.apply(command).await {
                                warn!(%error, "command failed");
                                self.notices.push(Notice::error(error.to_string()));
                            }
                        }
                    }
                }

                // Store change event
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if event.touches(self.window) {
                                self.refresh_or_flag().await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            debug!(missed, "event feed lagged, resyncing");
                            self.refresh_or_flag().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                // Debounce timer
                () = tokio::time::sleep_until(timer.unwrap_or_else(tokio::time::Instant::now)),
                    if timer.is_some() =>
                {
                    if let Some(due) = deadline {
                        self.tick(due).await;
                    }
                }
            }
        }

        self.blur().await;
        info!("planner loop stopped");
        Ok(self)
    }

    async fn apply(&mut self, command: PlannerCommand) -> Result<(), PlannerError> {
        match command {
            PlannerCommand::Focus(addr) => self.focus(addr).await,
            PlannerCommand::Input(text) => self.input(text, Instant::now()),
            PlannerCommand::Blur => {
                self.blur().await;
                Ok(())
            }
            PlannerCommand::DeleteRow(id) => self.delete_row(id).await,
            PlannerCommand::StepWeek(delta) => self.step_week(delta).await,
            PlannerCommand::JumpTo(date) => self.jump_to(date).await,
            PlannerCommand::SetDepartment(choice) => self.set_department(choice).await,
            PlannerCommand::GhostInput {
                employee,
                field,
                text,
            } => self.ghost_input(employee, field, text),
            PlannerCommand::GhostCommit { employee, trigger } => {
                self.ghost_commit(employee, trigger).await.map(|_| ())
            }
            PlannerCommand::GhostAnswer { employee, answer } => {
                self.ghost_answer(employee, answer).await.map(|_| ())
            }
            PlannerCommand::SetProjectStatus { project, status } => {
                self.set_project_status(project, status).await;
                Ok(())
            }
            PlannerCommand::SetProjectManager { project, manager } => {
                self.set_project_manager(project, manager).await;
                Ok(())
            }
            // Handled by the loop before dispatch
            PlannerCommand::Shutdown => Ok(()),
        }
    }

    async fn apply_commit(&mut self, commit: PendingCommit) {
        let patch = commit.patch();
        debug!(field = commit.addr.field.name(), "committing cell");
        if let Some(row) = self.grid.row_mut(commit.addr.allocation) {
            patch.apply(&mut row.allocation);
        }
        if let Err(error) = self
            .allocations
            .update_field(commit.addr.allocation, patch)
            .await
        {
            warn!(%error, "cell commit failed, keeping local value");
            self.stale = true;
            self.notices.push(Notice::warning(format!(
                "couldn't save {}: {error}",
                commit.addr.field.name()
            )));
        }
    }

    async fn patch_project(&mut self, project: ProjectId, patch: ProjectPatch) {
        for group in &mut self.grid.groups {
            for row in &mut group.rows {
                if let ProjectLink::Resolved { project: linked, .. } = &mut row.link {
                    if linked.id == project {
                        patch.apply(linked);
                    }
                }
            }
        }
        if let Err(error) = self.directory.update_project(project, patch).await {
            warn!(%error, %project, "project update failed");
            self.stale = true;
            self.notices
                .push(Notice::warning(format!("couldn't update project: {error}")));
        }
    }

    /// Membership first, then the optimistic grid insert; the row only
    /// shows after the membership upsert has been attempted
    async fn finish_ghost(&mut self, outcome: &GhostOutcome) {
        let (allocation, project, client) = match outcome {
            GhostOutcome::Linked {
                allocation,
                project,
                client,
            }
            | GhostOutcome::Created {
                allocation,
                project,
                client,
                ..
            } => (allocation.clone(), project.clone(), client.clone()),
            GhostOutcome::Prompted(_) | GhostOutcome::Untouched => return,
        };

        if let Some(notice) = self
            .membership
            .ensure(project.id, allocation.employee)
            .await
        {
            self.notices.push(notice);
        }

        let employee = allocation.employee;
        let pushed = self.grid.push_row(AllocationRow {
            allocation,
            link: ProjectLink::Resolved { project, client },
        });
        if !pushed {
            debug!(%employee, "created row's employee not in view, waiting for refresh");
        }
    }

    fn ghost_mut(&mut self, employee: EmployeeId) -> &mut GhostRow {
        self.ghosts
            .entry(employee)
            .or_insert_with(|| GhostRow::new(employee))
    }

    async fn refresh_or_flag(&mut self) {
        if let Err(error) = self.refresh().await {
            warn!(%error, "refresh failed");
            self.stale = true;
            self.notices
                .push(Notice::warning(format!("couldn't refresh: {error}")));
        }
    }
}

impl std::fmt::Debug for PlannerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerEngine")
            .field("window", &self.window)
            .field("department", &self.department)
            .field("rows", &self.grid.row_count())
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FieldKind;
    use rap_model::Workday;
    use rap_test_utils::{fixture_week, PlannerFixture};

    fn engine_over(fixture: &PlannerFixture) -> PlannerEngine {
        PlannerEngine::new(
            PlannerConfig::default(),
            fixture.allocations.clone(),
            fixture.directory.clone(),
            fixture.memberships.clone(),
            fixture.roster.clone(),
            fixture_week(),
        )
    }

    #[tokio::test]
    async fn refresh_builds_groups_for_the_full_roster() {
        let fixture = PlannerFixture::seeded();
        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();

        // Default department rule picks the first roster department
        assert_eq!(engine.grid().department.as_deref(), Some("Design"));
        assert_eq!(engine.grid().groups.len(), 2);
        assert_eq!(engine.totals().grand, 0.0);

        engine
            .set_department(DepartmentChoice::All)
            .await
            .unwrap();
        assert_eq!(engine.grid().groups.len(), 4);
    }

    #[tokio::test]
    async fn hour_edit_commits_once_on_blur() {
        let fixture = PlannerFixture::seeded();
        let employee = fixture.employee("RV").id;
        let project = fixture.project("Website Redesign").id;
        let row = fixture
            .allocations
            .create(employee, project, fixture_week())
            .await
            .unwrap();

        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();

        let addr = CellAddr::new(row.id, FieldKind::Day(Workday::Monday));
        engine.focus(addr).await.unwrap();
        engine.input("4", Instant::now()).unwrap();

        // Still local while the cell keeps focus
        assert_eq!(engine.totals().day(Workday::Monday), 0.0);
        let stored = fixture.allocations.list(fixture_week()).await.unwrap();
        assert_eq!(stored[0].hours.monday, 0.0);

        engine.blur().await;

        assert_eq!(engine.totals().day(Workday::Monday), 4.0);
        let stored = fixture.allocations.list(fixture_week()).await.unwrap();
        assert_eq!(stored[0].hours.monday, 4.0);
        assert!(!engine.is_stale());
    }

    #[tokio::test]
    async fn focused_buffer_survives_refresh() {
        let fixture = PlannerFixture::seeded();
        let employee = fixture.employee("RV").id;
        let project = fixture.project("Website Redesign").id;
        let row = fixture
            .allocations
            .create(employee, project, fixture_week())
            .await
            .unwrap();

        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();

        let addr = CellAddr::new(row.id, FieldKind::Comment);
        engine.focus(addr).await.unwrap();
        engine.input("waiting on sign-off", Instant::now()).unwrap();

        engine.refresh().await.unwrap();
        assert_eq!(engine.buffer(), Some("waiting on sign-off"));
        assert_eq!(engine.focused(), Some(addr));
    }

    #[tokio::test]
    async fn debounced_edit_commits_on_tick() {
        let fixture = PlannerFixture::seeded();
        let employee = fixture.employee("RV").id;
        let project = fixture.project("Website Redesign").id;
        let row = fixture
            .allocations
            .create(employee, project, fixture_week())
            .await
            .unwrap();

        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();

        let addr = CellAddr::new(row.id, FieldKind::Task);
        let start = Instant::now();
        engine.focus(addr).await.unwrap();
        engine.input("concept sketches", start).unwrap();

        // Nothing persisted yet
        let stored = fixture.allocations.list(fixture_week()).await.unwrap();
        assert_eq!(stored[0].task, "");

        let deadline = engine.next_deadline().unwrap();
        engine.tick(deadline).await;

        let stored = fixture.allocations.list(fixture_week()).await.unwrap();
        assert_eq!(stored[0].task, "concept sketches");
        assert!(engine.next_deadline().is_none());
    }

    #[tokio::test]
    async fn stepping_weeks_walks_the_calendar() {
        let fixture = PlannerFixture::seeded();
        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();

        engine.step_week(1).await.unwrap();
        assert_eq!(engine.window(), WeekWindow::new(2025, 13));

        engine.step_week(-2).await.unwrap();
        assert_eq!(engine.window(), WeekWindow::new(2025, 11));
    }

    #[tokio::test]
    async fn deleting_one_of_two_rows_leaves_the_other() {
        let fixture = PlannerFixture::seeded();
        let employee = fixture.employee("RV").id;
        let project = fixture.project("Website Redesign").id;
        let keep = fixture
            .allocations
            .create(employee, project, fixture_week())
            .await
            .unwrap();
        let doomed = fixture
            .allocations
            .create(employee, project, fixture_week())
            .await
            .unwrap();

        let mut engine = engine_over(&fixture);
        engine.refresh().await.unwrap();
        assert_eq!(engine.grid().row_count(), 2);

        engine.delete_row(doomed.id).await.unwrap();
        assert_eq!(engine.grid().row_count(), 1);
        assert!(engine.grid().row(keep.id).is_some());

        let stored = fixture.allocations.list(fixture_week()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, keep.id);
    }
}
