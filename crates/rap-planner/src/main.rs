use chrono::NaiveDate;
use clap::{Arg, ArgAction, Command};
use rap_model::{Client, Employee, Project, ResourceAllocation, WeekWindow, Workday};
use rap_planner::{
    format_hours, CellAddr, CommitTrigger, DepartmentChoice, FieldKind, GhostField, GhostOutcome,
    PlannerConfig, PlannerEngine, PlanningGrid, PromptAnswer,
};
use rap_store::{
    ChangeFeed, MembershipRegistry, MemoryAllocationStore, MemoryDirectory,
    MemoryMembershipRegistry, MemoryRoster,
};
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Command::new("rap-planner")
        .version(rap_planner::VERSION)
        .about("Weekly resource allocation planner")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Run a scripted planning session over seeded in-memory stores")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Any date inside the week to plan (YYYY-MM-DD, default today)"),
                )
                .arg(
                    Arg::new("department")
                        .long("department")
                        .help("Department filter (default: whole roster)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to a TOML planner config"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the final grid as JSON instead of the narrative"),
                ),
        )
        .subcommand(
            Command::new("week")
                .about("Show ISO week windows around a date")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("The date to start from (YYYY-MM-DD, default today)"),
                )
                .arg(
                    Arg::new("step")
                        .long("step")
                        .default_value("1")
                        .value_parser(clap::value_parser!(i64))
                        .help("Weeks to step forward (negative for back)"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("demo", args)) => {
            let date = parse_date(args.get_one::<String>("date"))?;
            let config = match args.get_one::<String>("config") {
                Some(path) => PlannerConfig::load(path)?,
                None => PlannerConfig::new(),
            };
            let department = args.get_one::<String>("department").cloned();
            let json = args.get_flag("json");
            run_demo(date, department, config, json).await?;
        }
        Some(("week", args)) => {
            let date = parse_date(args.get_one::<String>("date"))?;
            let step = *args.get_one::<i64>("step").unwrap();
            show_weeks(date, step);
        }
        _ => {}
    }

    Ok(())
}

fn parse_date(arg: Option<&String>) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn show_weeks(date: NaiveDate, step: i64) {
    let window = WeekWindow::for_date(date);
    match window.monday() {
        Some(monday) => println!("{date} falls in {window}, starting Monday {monday}"),
        None => println!("{date} falls in {window}"),
    }
    let stepped = WeekWindow::for_date(rap_model::step_week(date, step));
    match stepped.monday() {
        Some(monday) => println!("{step:+} week(s): {stepped}, starting Monday {monday}"),
        None => println!("{step:+} week(s): {stepped}"),
    }
}

/// Seeded world for the demo session
struct DemoWorld {
    allocations: Arc<MemoryAllocationStore>,
    directory: Arc<MemoryDirectory>,
    memberships: Arc<MemoryMembershipRegistry>,
    roster: Arc<MemoryRoster>,
    rita: Employee,
    omar: Employee,
    lena: Employee,
    seeded_row: ResourceAllocation,
}

fn seed(window: WeekWindow, feed_capacity: usize) -> DemoWorld {
    let feed = ChangeFeed::new(feed_capacity);

    let rita = Employee::new("Rita Vargas", "RV")
        .with_department("Design")
        .with_title("Senior Designer");
    let omar = Employee::new("Omar Ba", "OB")
        .with_department("Engineering")
        .with_title("Backend Engineer");
    let lena = Employee::new("Lena Fischer", "LF").with_department("Design");
    let roster = Arc::new(MemoryRoster::new(vec![
        rita.clone(),
        omar.clone(),
        lena.clone(),
    ]));

    let directory = Arc::new(MemoryDirectory::new().with_feed(feed.clone()));
    let acme = Client::new("Acme Corp");
    let northwind = Client::new("Northwind Ltd");
    directory.seed_client(acme.clone());
    directory.seed_client(northwind.clone());
    let website = Project::new("Website Redesign")
        .with_job_number("24-031")
        .with_client(acme.id);
    let migration = Project::new("Backend Migration")
        .with_job_number("24-007")
        .with_client(northwind.id);
    directory.seed_project(website.clone());
    directory.seed_project(migration);

    let allocations = Arc::new(MemoryAllocationStore::new().with_feed(feed));
    let mut seeded_row = ResourceAllocation::new(rita.id, website.id, window);
    seeded_row.hours.set(Workday::Tuesday, 4.0);
    seeded_row.hours.set(Workday::Wednesday, 4.0);
    seeded_row.task = "wireframes".to_string();
    allocations.seed(seeded_row.clone());

    DemoWorld {
        allocations,
        directory,
        memberships: Arc::new(MemoryMembershipRegistry::new()),
        roster,
        rita,
        omar,
        lena,
        seeded_row,
    }
}

async fn run_demo(
    date: NaiveDate,
    department: Option<String>,
    config: PlannerConfig,
    json: bool,
) -> anyhow::Result<()> {
    let window = WeekWindow::for_date(date);
    let world = seed(window, config.feed_capacity);

    let mut engine = PlannerEngine::new(
        config,
        world.allocations.clone(),
        world.directory.clone(),
        world.memberships.clone(),
        world.roster.clone(),
        window,
    );
    let choice = match department {
        Some(name) => DepartmentChoice::Only(name),
        None => DepartmentChoice::All,
    };
    engine.set_department(choice).await?;

    if !json {
        println!("RAP planner demo");
        print_grid(engine.grid());
        println!();
    }

    // Numeric cells buffer locally and commit when focus leaves
    let addr = CellAddr::new(world.seeded_row.id, FieldKind::Day(Workday::Monday));
    engine.focus(addr).await?;
    engine.input("6", Instant::now())?;
    engine.blur().await;
    if !json {
        println!(
            "Set Monday to 6h on {}'s Website Redesign row",
            world.rita.initials
        );
    }

    // Exact job number match links without touching the directory
    engine.ghost_input(world.omar.id, GhostField::JobNumber, "24-007")?;
    let outcome = engine
        .ghost_commit(world.omar.id, CommitTrigger::JobNumberBlur)
        .await?;
    if !json {
        println!(
            "Ghost row for {}: job number 24-007 -> {}",
            world.omar.initials,
            describe(&outcome)
        );
    }

    // A known title links straight to the existing project, whatever the case
    engine.ghost_input(world.lena.id, GhostField::Title, "website redesign")?;
    let outcome = engine
        .ghost_commit(world.lena.id, CommitTrigger::Enter)
        .await?;
    if !json {
        println!(
            "Ghost row for {}: title \"website redesign\" -> {}",
            world.lena.initials,
            describe(&outcome)
        );
    }

    // An unknown title creates the project, reusing the typed client
    engine.ghost_input(world.rita.id, GhostField::Title, "Brand Refresh")?;
    engine.ghost_input(world.rita.id, GhostField::Client, "Acme Corp")?;
    let outcome = engine
        .ghost_commit(world.rita.id, CommitTrigger::Enter)
        .await?;
    if !json {
        println!(
            "Ghost row for {}: new title \"Brand Refresh\" -> {}",
            world.rita.initials,
            describe(&outcome)
        );
    }

    // A bare unknown title pauses until a client or job number arrives
    engine.ghost_input(world.omar.id, GhostField::Title, "Spring Campaign")?;
    let outcome = engine
        .ghost_commit(world.omar.id, CommitTrigger::Enter)
        .await?;
    if !json {
        println!(
            "Ghost row for {}: bare title \"Spring Campaign\" -> {}",
            world.omar.initials,
            describe(&outcome)
        );
    }
    if matches!(outcome, GhostOutcome::Prompted(_)) {
        let outcome = engine
            .ghost_answer(
                world.omar.id,
                PromptAnswer::default().with_client("Fresh Farms"),
            )
            .await?;
        if !json {
            println!(
                "  answered with client \"Fresh Farms\" -> {}",
                describe(&outcome)
            );
        }
    }

    if json {
        let report = serde_json::json!({
            "grid": engine.grid(),
            "totals": engine.totals(),
            "notices": engine.take_notices(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    print_grid(engine.grid());

    println!();
    println!(
        "Projects in directory: {}  Clients: {}",
        world.directory.project_count(),
        world.directory.client_count()
    );
    for group in &engine.grid().groups {
        for row in &group.rows {
            let members = world.memberships.members(row.link.project_id()).await?;
            if !members.is_empty() {
                println!(
                    "  {} has {} recorded member(s)",
                    row.link.title(),
                    members.len()
                );
            }
        }
    }

    let notices = engine.take_notices();
    if !notices.is_empty() {
        println!();
        for notice in notices {
            println!("[{:?}] {}", notice.level, notice.message);
        }
    }

    Ok(())
}

fn describe(outcome: &GhostOutcome) -> String {
    match outcome {
        GhostOutcome::Linked { project, .. } => format!("linked to \"{}\"", project.title),
        GhostOutcome::Created {
            project,
            client,
            client_created,
            ..
        } => {
            let client = match (client, client_created) {
                (Some(c), true) => format!(" with new client \"{}\"", c.name),
                (Some(c), false) => format!(" under existing client \"{}\"", c.name),
                (None, _) => String::new(),
            };
            format!("created \"{}\"{client}", project.title)
        }
        GhostOutcome::Prompted(prompt) => prompt.message(),
        GhostOutcome::Untouched => "nothing to commit".to_string(),
    }
}

fn print_grid(grid: &PlanningGrid) {
    match &grid.department {
        Some(department) => println!("{} ({department})", grid.window),
        None => println!("{} (all departments)", grid.window),
    }
    for group in &grid.groups {
        println!("{} ({})", group.employee.name, group.employee.initials);
        if group.rows.is_empty() {
            println!("  (no allocations)");
            continue;
        }
        for row in &group.rows {
            let hours = &row.allocation.hours;
            println!(
                "  {:<24} {:<14} {:>5} {:>5} {:>5} {:>5} {:>5}   {:>6}",
                row.link.title(),
                row.link.client_name().unwrap_or("-"),
                format_hours(hours.monday),
                format_hours(hours.tuesday),
                format_hours(hours.wednesday),
                format_hours(hours.thursday),
                format_hours(hours.friday),
                format_hours(row.allocation.total_hours()),
            );
        }
    }
    let totals = grid.totals();
    println!(
        "  {:<24} {:<14} {:>5} {:>5} {:>5} {:>5} {:>5}   {:>6}",
        "Total",
        "",
        format_hours(totals.day(Workday::Monday)),
        format_hours(totals.day(Workday::Tuesday)),
        format_hours(totals.day(Workday::Wednesday)),
        format_hours(totals.day(Workday::Thursday)),
        format_hours(totals.day(Workday::Friday)),
        format_hours(totals.grand),
    );
}
