use indexmap::IndexMap;
use proptest::prelude::*;
use rap_model::{
    Client, ClientId, Employee, EmployeeId, Project, ProjectId, ResourceAllocation, WeekWindow,
    Workday,
};
use rap_planner::{build_grid, FieldKind, GridTotals};

fn window() -> WeekWindow {
    WeekWindow::new(2025, 12)
}

fn hydration(project: &Project) -> (IndexMap<ProjectId, Project>, IndexMap<ClientId, Client>) {
    let mut projects = IndexMap::new();
    projects.insert(project.id, project.clone());
    (projects, IndexMap::new())
}

fn row_with_cells(employee: EmployeeId, project: ProjectId, cells: &[f64]) -> ResourceAllocation {
    let mut row = ResourceAllocation::new(employee, project, window());
    for (day, value) in Workday::ALL.iter().zip(cells) {
        row.hours.set(*day, *value);
    }
    row
}

proptest! {
    #[test]
    fn prop_grid_totals_sum_every_cell(
        cell_grids in proptest::collection::vec(proptest::collection::vec(0.0f64..12.0, 5), 0..8)
    ) {
        let employee = Employee::new("Prop Tester", "PT");
        let project = Project::new("Prop Project");
        let (projects, clients) = hydration(&project);

        let rows = cell_grids
            .iter()
            .map(|cells| row_with_cells(employee.id, project.id, cells))
            .collect();
        let grid = build_grid(window(), None, &[employee], rows, &projects, &clients);
        let totals = grid.totals();

        for (index, day) in Workday::ALL.iter().enumerate() {
            let expected: f64 = cell_grids.iter().map(|cells| cells[index]).sum();
            assert!((totals.day(*day) - expected).abs() < 1e-9);
        }
        let grand: f64 = cell_grids.iter().flatten().sum();
        assert!((totals.grand - grand).abs() < 1e-9);
    }

    #[test]
    fn prop_group_totals_partition_the_grand_total(
        assignments in proptest::collection::vec(
            (0usize..4, proptest::collection::vec(0.0f64..12.0, 5)),
            0..12,
        )
    ) {
        let employees: Vec<Employee> = ["Ann", "Ben", "Cleo", "Dev"]
            .iter()
            .map(|name| Employee::new(*name, "XX"))
            .collect();
        let project = Project::new("Prop Project");
        let (projects, clients) = hydration(&project);

        let rows = assignments
            .iter()
            .map(|(index, cells)| row_with_cells(employees[*index].id, project.id, cells))
            .collect();
        let grid = build_grid(window(), None, &employees, rows, &projects, &clients);

        let from_groups: f64 = grid.groups.iter().map(|group| group.totals().grand).sum();
        assert!((grid.totals().grand - from_groups).abs() < 1e-9);
    }

    #[test]
    fn prop_hostile_hour_values_never_corrupt_totals(
        values in proptest::collection::vec(
            prop_oneof![
                -1000.0f64..1000.0,
                Just(f64::NAN),
                Just(f64::INFINITY),
                Just(f64::NEG_INFINITY),
            ],
            5,
        )
    ) {
        let mut row = ResourceAllocation::new(EmployeeId::new(), ProjectId::new(), window());
        for (day, value) in Workday::ALL.iter().zip(&values) {
            row.hours.set(*day, *value);
        }

        let totals = GridTotals::of([&row]);
        assert!(totals.grand >= 0.0);
        assert!(totals.grand.is_finite());
        for day in Workday::ALL {
            assert!(totals.day(day) >= 0.0);
            assert!(totals.day(day).is_finite());
        }
    }

    #[test]
    fn prop_day_patches_from_arbitrary_text_stay_non_negative(
        raw in "\\PC{0,12}",
        day_index in 0usize..5,
    ) {
        let day = Workday::ALL[day_index];
        let patch = FieldKind::Day(day).patch_for(&raw);

        let mut row = ResourceAllocation::new(EmployeeId::new(), ProjectId::new(), window());
        patch.apply(&mut row);

        assert!(row.hours.get(day) >= 0.0);
        assert!(row.hours.get(day).is_finite());
        assert!(row.total_hours() >= 0.0);
    }

    #[test]
    fn prop_grid_keeps_every_roster_employee_in_name_order(
        names in proptest::collection::vec("[A-Za-z]{1,12}", 1..8)
    ) {
        let employees: Vec<Employee> = names
            .iter()
            .map(|name| Employee::new(name.clone(), "XX"))
            .collect();
        let grid = build_grid(
            window(),
            None,
            &employees,
            Vec::new(),
            &IndexMap::new(),
            &IndexMap::new(),
        );

        assert_eq!(grid.groups.len(), employees.len());
        for pair in grid.groups.windows(2) {
            assert!(pair[0].employee.name <= pair[1].employee.name);
        }
    }
}
