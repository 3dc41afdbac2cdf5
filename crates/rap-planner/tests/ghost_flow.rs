//! Ghost row resolution, end to end through the engine
//!
//! Covers every rung of the ladder: job-number links, case-insensitive
//! title links, project/client creation, the bare-title prompt, suggestion
//! picks, and the blank-title no-op.

use pretty_assertions::assert_eq;
use rap_model::{MemberRole, Workday};
use rap_planner::{
    CellAddr, CommitTrigger, DepartmentChoice, FieldKind, GhostField, GhostOutcome, GhostState,
    PlannerConfig, PlannerEngine, PromptAnswer,
};
use rap_store::{AllocationStore, MembershipRegistry, StoreError};
use rap_test_utils::{fixture_week, PlannerFixture};
use std::sync::Arc;

async fn engine_over(fixture: &PlannerFixture) -> PlannerEngine {
    let mut engine = PlannerEngine::new(
        PlannerConfig::default(),
        fixture.allocations.clone(),
        fixture.directory.clone(),
        fixture.memberships.clone(),
        fixture.roster.clone(),
        fixture_week(),
    );
    engine.set_department(DepartmentChoice::All).await.unwrap();
    engine
}

#[tokio::test]
async fn exact_job_number_links_without_new_entities() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let omar = fixture.employee("OB").id;

    engine
        .ghost_input(omar, GhostField::JobNumber, "24-007")
        .unwrap();
    let outcome = engine
        .ghost_commit(omar, CommitTrigger::JobNumberBlur)
        .await
        .unwrap();

    match outcome {
        GhostOutcome::Linked { project, client, .. } => {
            assert_eq!(project.title, "Backend Migration");
            assert_eq!(client.unwrap().name, "Northwind Ltd");
        }
        other => panic!("expected link, got {other:?}"),
    }

    // Nothing new in the directory, one new allocation
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(fixture.directory.client_count(), 2);
    assert_eq!(fixture.allocations.len(), 1);

    // Row landed in the grid and the ghost row went back to idle
    assert_eq!(engine.grid().row_count(), 1);
    assert_eq!(engine.ghost(omar).unwrap().state(), GhostState::Idle);
}

#[tokio::test]
async fn job_number_match_is_case_sensitive_and_beats_title() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let omar = fixture.employee("OB").id;

    // Typed title names one project, job number another; job number wins
    engine
        .ghost_input(omar, GhostField::Title, "Website Redesign")
        .unwrap();
    engine
        .ghost_input(omar, GhostField::JobNumber, "24-007")
        .unwrap();

    let outcome = engine
        .ghost_commit(omar, CommitTrigger::Enter)
        .await
        .unwrap();
    assert_eq!(
        outcome.allocation().unwrap().project,
        fixture.project("Backend Migration").id
    );
}

#[tokio::test]
async fn exact_title_match_links_to_the_existing_project() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    // Exact title match is case-insensitive
    engine
        .ghost_input(lena, GhostField::Title, "website redesign")
        .unwrap();
    let outcome = engine
        .ghost_commit(lena, CommitTrigger::TitleBlur)
        .await
        .unwrap();

    match outcome {
        GhostOutcome::Linked { project, client, .. } => {
            assert_eq!(project.id, fixture.project("Website Redesign").id);
            assert_eq!(client.unwrap().name, "Acme Corp");
        }
        other => panic!("expected link, got {other:?}"),
    }

    // Linking created the allocation but no directory entities
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(fixture.directory.client_count(), 2);
    assert_eq!(fixture.allocations.len(), 1);
    assert_eq!(engine.grid().row_count(), 1);
    assert_eq!(engine.ghost(lena).unwrap().state(), GhostState::Idle);
}

#[tokio::test]
async fn bare_title_prompts_and_creates_nothing_until_answered() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    // Unknown title with neither client nor job number
    engine
        .ghost_input(lena, GhostField::Title, "Spring Campaign")
        .unwrap();
    let outcome = engine
        .ghost_commit(lena, CommitTrigger::Enter)
        .await
        .unwrap();

    let prompt = match outcome {
        GhostOutcome::Prompted(prompt) => prompt,
        other => panic!("expected prompt, got {other:?}"),
    };
    assert!(prompt.message().contains("Spring Campaign"));

    // No entities yet, prompt still open on the row
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(fixture.directory.client_count(), 2);
    assert_eq!(fixture.allocations.len(), 0);
    assert_eq!(engine.grid().row_count(), 0);
    assert_eq!(
        engine.ghost(lena).unwrap().state(),
        GhostState::AwaitingDisambiguation
    );
    assert!(engine.ghost_prompt(lena).is_some());

    let outcome = engine
        .ghost_answer(lena, PromptAnswer::default().with_client("Fresh Farms"))
        .await
        .unwrap();
    let (project, client, client_created) = match outcome {
        GhostOutcome::Created {
            project,
            client,
            client_created,
            ..
        } => (project, client.unwrap(), client_created),
        other => panic!("expected creation, got {other:?}"),
    };

    // The originally typed title plus the supplied client
    assert_eq!(project.title, "Spring Campaign");
    assert_eq!(project.client, Some(client.id));
    assert_eq!(client.name, "Fresh Farms");
    assert!(client_created);

    assert_eq!(fixture.directory.project_count(), 4);
    assert_eq!(fixture.directory.client_count(), 3);
    assert_eq!(fixture.allocations.len(), 1);
    assert_eq!(engine.grid().row_count(), 1);
    assert_eq!(engine.ghost(lena).unwrap().state(), GhostState::Idle);
}

#[tokio::test]
async fn prompt_answered_with_a_job_number_creates_the_project() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    engine
        .ghost_input(lena, GhostField::Title, "Spring Campaign")
        .unwrap();
    engine
        .ghost_commit(lena, CommitTrigger::Enter)
        .await
        .unwrap();

    let outcome = engine
        .ghost_answer(lena, PromptAnswer::default().with_job_number("25-200"))
        .await
        .unwrap();
    match outcome {
        GhostOutcome::Created {
            project, client, ..
        } => {
            assert_eq!(project.title, "Spring Campaign");
            assert_eq!(project.job_number.as_deref(), Some("25-200"));
            assert_eq!(client, None);
        }
        other => panic!("expected creation, got {other:?}"),
    }
    assert_eq!(fixture.directory.client_count(), 2);
}

#[tokio::test]
async fn blank_prompt_answer_is_refused_and_keeps_the_prompt() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    engine
        .ghost_input(lena, GhostField::Title, "Spring Campaign")
        .unwrap();
    engine
        .ghost_commit(lena, CommitTrigger::Enter)
        .await
        .unwrap();

    let result = engine.ghost_answer(lena, PromptAnswer::default()).await;
    assert!(result.is_err());

    assert_eq!(
        engine.ghost(lena).unwrap().state(),
        GhostState::AwaitingDisambiguation
    );
    assert!(engine.ghost_prompt(lena).is_some());
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(fixture.allocations.len(), 0);
}

#[tokio::test]
async fn cancelling_the_prompt_discards_the_row() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    engine
        .ghost_input(lena, GhostField::Title, "Spring Campaign")
        .unwrap();
    engine
        .ghost_commit(lena, CommitTrigger::Enter)
        .await
        .unwrap();

    engine.ghost_cancel(lena).unwrap();

    let row = engine.ghost(lena).unwrap();
    assert_eq!(row.state(), GhostState::Idle);
    assert!(row.input().is_blank());
    assert!(engine.ghost_prompt(lena).is_none());
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(fixture.allocations.len(), 0);
}

#[tokio::test]
async fn unknown_title_and_client_create_both_and_record_membership() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let lena = fixture.employee("LF").id;

    engine
        .ghost_input(lena, GhostField::Title, "Spring Campaign")
        .unwrap();
    engine
        .ghost_input(lena, GhostField::JobNumber, "25-104")
        .unwrap();
    engine
        .ghost_input(lena, GhostField::Client, "Fresh Farms")
        .unwrap();

    let outcome = engine
        .ghost_commit(lena, CommitTrigger::Enter)
        .await
        .unwrap();
    let (allocation, project, client, client_created) = match outcome {
        GhostOutcome::Created {
            allocation,
            project,
            client,
            client_created,
        } => (allocation, project, client.unwrap(), client_created),
        other => panic!("expected creation, got {other:?}"),
    };

    assert!(client_created);
    assert_eq!(client.name, "Fresh Farms");
    assert_eq!(project.title, "Spring Campaign");
    assert_eq!(project.job_number.as_deref(), Some("25-104"));
    assert_eq!(project.client, Some(client.id));

    // Allocation sits in the committed week with empty cells
    assert_eq!(allocation.employee, lena);
    assert_eq!(allocation.year, 2025);
    assert_eq!(allocation.week, 12);
    assert!(allocation.hours.is_zero());

    assert_eq!(fixture.directory.project_count(), 4);
    assert_eq!(fixture.directory.client_count(), 3);

    // Membership recorded before the row reached the grid
    let members = fixture.memberships.members(project.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].employee, lena);
    assert_eq!(members[0].role, MemberRole::Member);

    assert!(engine.grid().row(allocation.id).is_some());
}

#[tokio::test]
async fn typed_client_matches_existing_one_case_insensitively() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let rita = fixture.employee("RV").id;

    engine
        .ghost_input(rita, GhostField::Title, "Brand Refresh")
        .unwrap();
    engine
        .ghost_input(rita, GhostField::Client, "  acme corp ")
        .unwrap();

    let outcome = engine
        .ghost_commit(rita, CommitTrigger::Enter)
        .await
        .unwrap();
    match outcome {
        GhostOutcome::Created {
            client,
            client_created,
            ..
        } => {
            assert!(!client_created);
            assert_eq!(client.unwrap().id, fixture.client("Acme Corp").id);
        }
        other => panic!("expected creation, got {other:?}"),
    }
    assert_eq!(fixture.directory.client_count(), 2);
}

#[tokio::test]
async fn suggestion_pick_skips_the_ladder() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let rita = fixture.employee("RV").id;

    engine.ghost_input(rita, GhostField::Title, "web").unwrap();
    let hits = engine.ghost_suggestions(rita).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].label(), "Website Redesign (Acme Corp)");

    let picked = hits[0].project.clone();
    let outcome = engine.ghost_pick(rita, &picked).await.unwrap();

    match outcome {
        GhostOutcome::Linked { project, .. } => assert_eq!(project.id, picked.id),
        other => panic!("expected link, got {other:?}"),
    }
    assert_eq!(fixture.directory.project_count(), 3);
    assert_eq!(engine.grid().row_count(), 1);
}

#[tokio::test]
async fn blank_title_with_unmatched_job_number_is_a_noop() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let theo = fixture.employee("TP").id;

    engine
        .ghost_input(theo, GhostField::JobNumber, "99-999")
        .unwrap();
    let outcome = engine
        .ghost_commit(theo, CommitTrigger::JobNumberBlur)
        .await
        .unwrap();

    assert_eq!(outcome, GhostOutcome::Untouched);
    assert_eq!(fixture.allocations.len(), 0);
    assert_eq!(fixture.directory.project_count(), 3);

    // Typed text stays editable
    let row = engine.ghost(theo).unwrap();
    assert_eq!(row.state(), GhostState::Typing);
    assert_eq!(row.input().job_number, "99-999");
}

#[tokio::test]
async fn failed_allocation_write_keeps_typed_input() {
    mockall::mock! {
        Store {}

        #[async_trait::async_trait]
        impl AllocationStore for Store {
            async fn list(
                &self,
                window: rap_model::WeekWindow,
            ) -> Result<Vec<rap_model::ResourceAllocation>, StoreError>;
            async fn create(
                &self,
                employee: rap_model::EmployeeId,
                project: rap_model::ProjectId,
                window: rap_model::WeekWindow,
            ) -> Result<rap_model::ResourceAllocation, StoreError>;
            async fn update_field(
                &self,
                id: rap_model::AllocationId,
                patch: rap_model::AllocationPatch,
            ) -> Result<(), StoreError>;
            async fn delete(&self, id: rap_model::AllocationId) -> Result<(), StoreError>;
            fn subscribe(&self) -> tokio::sync::broadcast::Receiver<rap_store::StoreEvent>;
        }
    }

    let fixture = PlannerFixture::seeded();
    let mut store = MockStore::new();
    store.expect_list().returning(|_| Ok(Vec::new()));
    store
        .expect_create()
        .times(1)
        .returning(|_, _, _| Err(StoreError::Unavailable("connection reset".to_string())));

    let mut engine = PlannerEngine::new(
        PlannerConfig::default(),
        Arc::new(store),
        fixture.directory.clone(),
        fixture.memberships.clone(),
        fixture.roster.clone(),
        fixture_week(),
    );
    engine.set_department(DepartmentChoice::All).await.unwrap();
    let rita = fixture.employee("RV").id;

    engine
        .ghost_input(rita, GhostField::Title, "Doomed Project")
        .unwrap();
    engine
        .ghost_input(rita, GhostField::Client, "Acme Corp")
        .unwrap();
    let result = engine.ghost_commit(rita, CommitTrigger::Enter).await;
    assert!(result.is_err());

    // The typed text survives for a retry
    let row = engine.ghost(rita).unwrap();
    assert_eq!(row.state(), GhostState::Typing);
    assert_eq!(row.input().title, "Doomed Project");
    assert_eq!(row.input().client, "Acme Corp");
    assert_eq!(engine.grid().row_count(), 0);

    // The project itself was created first; a retry links it by title
    assert_eq!(fixture.directory.project_count(), 4);
}

#[tokio::test]
async fn linked_rows_start_with_zero_hours_and_count_in_totals_after_edit() {
    let fixture = PlannerFixture::seeded();
    let mut engine = engine_over(&fixture).await;
    let omar = fixture.employee("OB").id;

    engine
        .ghost_input(omar, GhostField::JobNumber, "24-031")
        .unwrap();
    let outcome = engine
        .ghost_commit(omar, CommitTrigger::JobNumberBlur)
        .await
        .unwrap();
    let allocation = outcome.allocation().unwrap().clone();

    assert_eq!(engine.totals().grand, 0.0);

    let addr = CellAddr::new(allocation.id, FieldKind::Day(Workday::Friday));
    engine.focus(addr).await.unwrap();
    engine.input("2.5", std::time::Instant::now()).unwrap();
    engine.blur().await;

    assert_eq!(engine.totals().day(Workday::Friday), 2.5);
    assert_eq!(engine.totals().grand, 2.5);
}
