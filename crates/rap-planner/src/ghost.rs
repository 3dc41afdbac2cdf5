//! Ghost-row resolution
//!
//! The empty trailing row under each employee group accepts free text for a
//! project title, job number, and client. Nothing persists while the user
//! types. A commit gesture (Enter or leaving the title or job-number cell)
//! runs the resolution ladder:
//!
//! 1. Typed job number exactly matches an existing project: link to it,
//!    ignoring the typed title and client.
//! 2. Typed title exactly matches an existing project title
//!    (case-insensitive): link to that project.
//! 3. A non-empty title together with a client or job number creates a
//!    project, resolving the typed client to an existing one or creating
//!    it too, then the allocation.
//! 4. A bare title with neither client nor job number opens a
//!    disambiguation prompt; nothing is created until the prompt is
//!    answered with at least one of the two. Cancelling discards the row.
//! 5. An empty title resolves to nothing; the typed text stays put.
//!
//! Picking a typeahead suggestion skips the ladder and links directly.
//! Store failures anywhere in the ladder leave the typed input in place so
//! the user can retry.

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use rap_model::{
    Client, EmployeeId, NewClient, NewProject, Project, ResourceAllocation, WeekWindow,
};
use rap_store::{AllocationStore, Directory, ProjectHit};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Ghost row lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostState {
    /// Untouched, rendered as an empty row
    Idle,
    /// Holds local text, nothing persisted yet
    Typing,
    /// Resolution paused until a client or job number is supplied
    AwaitingDisambiguation,
}

/// Legal targets from a ghost state
#[must_use]
pub fn allowed_transitions(from: GhostState) -> Vec<GhostState> {
    use GhostState::*;
    match from {
        Idle => vec![Typing],
        Typing => vec![Idle, AwaitingDisambiguation],
        AwaitingDisambiguation => vec![Idle, Typing],
    }
}

/// Validates a ghost state transition
pub fn validate_transition(from: GhostState, to: GhostState) -> Result<(), GhostError> {
    if allowed_transitions(from).into_iter().any(|s| s == to) {
        Ok(())
    } else {
        Err(GhostError::IllegalTransition { from, to })
    }
}

/// Ghost row sequencing errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GhostError {
    /// The row was driven to a state it cannot reach
    #[error("illegal ghost row transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: GhostState,
        /// Requested state
        to: GhostState,
    },

    /// An answer arrived with no prompt open
    #[error("no disambiguation prompt is open")]
    NoPromptOpen,

    /// A commit or edit arrived while a prompt waits for its answer
    #[error("a disambiguation prompt is waiting for an answer")]
    PromptOpen,

    /// A prompt was confirmed without the details it asked for
    #[error("a client name or job number is required to create the project")]
    DetailsRequired,
}

/// Which ghost cell received text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostField {
    /// Project title cell
    Title,
    /// Job number cell
    JobNumber,
    /// Client cell
    Client,
}

/// The gesture that asked for resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    /// Enter pressed anywhere in the ghost row
    Enter,
    /// Focus left the title cell
    TitleBlur,
    /// Focus left the job-number cell
    JobNumberBlur,
}

/// Free text typed into the ghost cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GhostInput {
    /// Project title cell text
    pub title: String,
    /// Job number cell text
    pub job_number: String,
    /// Client cell text
    pub client: String,
}

impl GhostInput {
    /// Whether every cell is blank after trimming
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.job_number.trim().is_empty()
            && self.client.trim().is_empty()
    }
}

/// Raised when a bare title matches nothing: a new project needs at least
/// a client name or a job number before it can be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguationPrompt {
    /// What the user had typed when resolution paused
    pub typed: GhostInput,
}

impl DisambiguationPrompt {
    /// Question text for the UI
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "No project matches \"{}\". Add a client name or a job number to create it.",
            self.typed.title.trim()
        )
    }
}

/// The details supplied to confirm a disambiguation prompt
///
/// At least one of the two must be non-blank; a blank answer is refused
/// and the prompt stays open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptAnswer {
    /// Client name for the new project, blank to omit
    pub client: String,
    /// Job number for the new project, blank to omit
    pub job_number: String,
}

impl PromptAnswer {
    /// Set the client name
    #[must_use]
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Set the job number
    #[must_use]
    pub fn with_job_number(mut self, job_number: impl Into<String>) -> Self {
        self.job_number = job_number.into();
        self
    }

    /// Whether both details are blank after trimming
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.client.trim().is_empty() && self.job_number.trim().is_empty()
    }
}

/// What a resolution pass did
#[derive(Debug, Clone, PartialEq)]
pub enum GhostOutcome {
    /// Linked to an existing project and created the allocation
    Linked {
        /// The created allocation
        allocation: ResourceAllocation,
        /// The linked project
        project: Project,
        /// The project's client, if any
        client: Option<Client>,
    },
    /// Created a project (and possibly a client), then the allocation
    Created {
        /// The created allocation
        allocation: ResourceAllocation,
        /// The new project
        project: Project,
        /// Linked or created client
        client: Option<Client>,
        /// Whether the client was created rather than matched
        client_created: bool,
    },
    /// A prompt is waiting for the user
    Prompted(DisambiguationPrompt),
    /// Nothing to resolve
    Untouched,
}

impl GhostOutcome {
    /// The allocation this outcome produced, if any
    #[must_use]
    pub fn allocation(&self) -> Option<&ResourceAllocation> {
        match self {
            Self::Linked { allocation, .. } | Self::Created { allocation, .. } => {
                Some(allocation)
            }
            Self::Prompted(_) | Self::Untouched => None,
        }
    }
}

/// One employee's empty trailing row
#[derive(Debug)]
pub struct GhostRow {
    employee: EmployeeId,
    state: GhostState,
    input: GhostInput,
    prompt: Option<DisambiguationPrompt>,
}

impl GhostRow {
    /// Fresh idle row for an employee
    #[inline]
    #[must_use]
    pub fn new(employee: EmployeeId) -> Self {
        Self {
            employee,
            state: GhostState::Idle,
            input: GhostInput::default(),
            prompt: None,
        }
    }

    /// The employee the row belongs to
    #[inline]
    #[must_use]
    pub fn employee(&self) -> EmployeeId {
        self.employee
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> GhostState {
        self.state
    }

    /// Current typed text
    #[inline]
    #[must_use]
    pub fn input(&self) -> &GhostInput {
        &self.input
    }

    /// The open prompt, if resolution is waiting on an answer
    #[inline]
    #[must_use]
    pub fn prompt(&self) -> Option<&DisambiguationPrompt> {
        self.prompt.as_ref()
    }

    /// Type into one ghost cell
    ///
    /// # Errors
    /// Rejected while a prompt is open
    pub fn set_field(
        &mut self,
        field: GhostField,
        text: impl Into<String>,
    ) -> Result<(), GhostError> {
        if self.state == GhostState::AwaitingDisambiguation {
            return Err(GhostError::PromptOpen);
        }
        match field {
            GhostField::Title => self.input.title = text.into(),
            GhostField::JobNumber => self.input.job_number = text.into(),
            GhostField::Client => self.input.client = text.into(),
        }
        let target = if self.input.is_blank() {
            GhostState::Idle
        } else {
            GhostState::Typing
        };
        self.transition(target)
    }

    /// Clear everything back to idle
    pub fn reset(&mut self) {
        self.state = GhostState::Idle;
        self.input = GhostInput::default();
        self.prompt = None;
    }

    fn transition(&mut self, to: GhostState) -> Result<(), GhostError> {
        if self.state == to {
            return Ok(());
        }
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    fn open_prompt(&mut self, prompt: DisambiguationPrompt) -> Result<(), GhostError> {
        self.transition(GhostState::AwaitingDisambiguation)?;
        self.prompt = Some(prompt);
        Ok(())
    }

    /// Close the prompt, dropping back to typing with the text intact
    fn take_prompt(&mut self) -> Result<DisambiguationPrompt, GhostError> {
        let prompt = self.prompt.take().ok_or(GhostError::NoPromptOpen)?;
        self.transition(GhostState::Typing)?;
        Ok(prompt)
    }
}

/// Turns committed ghost input into directory entities and an allocation
pub struct GhostResolver {
    directory: Arc<dyn Directory>,
    allocations: Arc<dyn AllocationStore>,
    min_chars: usize,
    limit: usize,
}

impl GhostResolver {
    /// Create a resolver over the directory and allocation store
    #[must_use]
    pub fn new(
        directory: Arc<dyn Directory>,
        allocations: Arc<dyn AllocationStore>,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            directory,
            allocations,
            min_chars: config.typeahead_min_chars,
            limit: config.typeahead_limit,
        }
    }

    /// Typeahead over projects for the title cell
    ///
    /// Queries below the minimum length return nothing without touching
    /// the directory.
    pub async fn suggest_projects(&self, query: &str) -> Result<Vec<ProjectHit>, PlannerError> {
        if query.trim().chars().count() < self.min_chars {
            return Ok(Vec::new());
        }
        Ok(self.directory.search_projects(query, self.limit).await?)
    }

    /// Typeahead over clients for the client cell
    pub async fn suggest_clients(&self, query: &str) -> Result<Vec<Client>, PlannerError> {
        if query.trim().chars().count() < self.min_chars {
            return Ok(Vec::new());
        }
        Ok(self.directory.search_clients(query, self.limit).await?)
    }

    /// Link straight to a picked suggestion, skipping the ladder
    pub async fn link_suggestion(
        &self,
        row: &mut GhostRow,
        project: &Project,
        window: WeekWindow,
    ) -> Result<GhostOutcome, PlannerError> {
        if row.state() == GhostState::AwaitingDisambiguation {
            return Err(GhostError::PromptOpen.into());
        }
        let client = self.client_of(project).await?;
        let allocation = self
            .allocations
            .create(row.employee(), project.id, window)
            .await?;
        info!(project = %project.id, "ghost row linked from suggestion");
        row.reset();
        Ok(GhostOutcome::Linked {
            allocation,
            project: project.clone(),
            client,
        })
    }

    /// Run the resolution ladder for a commit gesture
    ///
    /// The row is only mutated on success: a store failure leaves state and
    /// typed text untouched.
    pub async fn resolve(
        &self,
        row: &mut GhostRow,
        trigger: CommitTrigger,
        window: WeekWindow,
    ) -> Result<GhostOutcome, PlannerError> {
        if row.state() == GhostState::AwaitingDisambiguation {
            return Err(GhostError::PromptOpen.into());
        }

        let input = row.input().clone();
        debug!(employee = %row.employee(), ?trigger, "resolving ghost row");

        let job_number = input.job_number.trim();
        if !job_number.is_empty() {
            if let Some(project) = self.directory.find_project_by_job_number(job_number).await? {
                let client = self.client_of(&project).await?;
                let allocation = self
                    .allocations
                    .create(row.employee(), project.id, window)
                    .await?;
                info!(project = %project.id, job_number, "ghost row linked by job number");
                row.reset();
                return Ok(GhostOutcome::Linked {
                    allocation,
                    project,
                    client,
                });
            }
        }

        let title = input.title.trim();
        if title.is_empty() {
            return Ok(GhostOutcome::Untouched);
        }

        if let Some(project) = self.directory.find_project_by_title(title).await? {
            let client = self.client_of(&project).await?;
            let allocation = self
                .allocations
                .create(row.employee(), project.id, window)
                .await?;
            info!(project = %project.id, title, "ghost row linked by title");
            row.reset();
            return Ok(GhostOutcome::Linked {
                allocation,
                project,
                client,
            });
        }

        if input.client.trim().is_empty() && job_number.is_empty() {
            let prompt = DisambiguationPrompt { typed: input };
            row.open_prompt(prompt.clone())?;
            debug!(employee = %row.employee(), "bare title, prompting for details");
            return Ok(GhostOutcome::Prompted(prompt));
        }

        self.create_and_allocate(row, &input, window).await
    }

    /// Confirm the open prompt with a client name or job number
    ///
    /// A blank answer is refused and the prompt stays open. Otherwise the
    /// details join the originally typed title and creation proceeds as if
    /// they had been typed up front.
    pub async fn answer(
        &self,
        row: &mut GhostRow,
        answer: PromptAnswer,
        window: WeekWindow,
    ) -> Result<GhostOutcome, PlannerError> {
        if row.prompt().is_none() {
            return Err(GhostError::NoPromptOpen.into());
        }
        if answer.is_blank() {
            return Err(GhostError::DetailsRequired.into());
        }
        row.take_prompt()?;
        // Details land in the row first so a store failure keeps them for a retry
        row.set_field(GhostField::Client, answer.client)?;
        row.set_field(GhostField::JobNumber, answer.job_number)?;
        let input = row.input().clone();
        self.create_and_allocate(row, &input, window).await
    }

    /// Dismiss the prompt, discarding the typed text
    pub fn cancel_prompt(&self, row: &mut GhostRow) -> Result<(), PlannerError> {
        row.take_prompt()?;
        row.reset();
        Ok(())
    }

    async fn create_and_allocate(
        &self,
        row: &mut GhostRow,
        input: &GhostInput,
        window: WeekWindow,
    ) -> Result<GhostOutcome, PlannerError> {
        let typed_client = input.client.trim();
        let (client, client_created) = if typed_client.is_empty() {
            (None, false)
        } else {
            match self.directory.find_client_by_name(typed_client).await? {
                Some(found) => (Some(found), false),
                None => {
                    let created = self
                        .directory
                        .create_client(NewClient::new(typed_client))
                        .await?;
                    info!(client = %created.id, name = %created.name, "client created from ghost row");
                    (Some(created), true)
                }
            }
        };

        let mut new_project =
            NewProject::new(input.title.trim()).with_job_number(input.job_number.trim());
        if let Some(client) = &client {
            new_project = new_project.with_client(client.id);
        }
        let project = self.directory.create_project(new_project).await?;
        info!(project = %project.id, title = %project.title, "project created from ghost row");

        let allocation = self
            .allocations
            .create(row.employee(), project.id, window)
            .await?;
        row.reset();
        Ok(GhostOutcome::Created {
            allocation,
            project,
            client,
            client_created,
        })
    }

    async fn client_of(&self, project: &Project) -> Result<Option<Client>, PlannerError> {
        match project.client {
            Some(id) => Ok(self.directory.fetch_clients(&[id]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}
