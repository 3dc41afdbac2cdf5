use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rap_model::{parse_hours, step_week, DayHours, WeekWindow, Workday};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn prop_week_number_stays_in_iso_range(offset in 0i64..40_000) {
        let date = epoch() + Duration::days(offset);
        let window = WeekWindow::for_date(date);
        assert!((1..=53).contains(&window.week));
    }

    #[test]
    fn prop_step_week_roundtrips(offset in 0i64..40_000, delta in -520i64..520) {
        let date = epoch() + Duration::days(offset);
        let there_and_back = step_week(step_week(date, delta), -delta);
        assert_eq!(there_and_back, date);
        assert_eq!(WeekWindow::for_date(there_and_back), WeekWindow::for_date(date));
    }

    #[test]
    fn prop_step_week_shifts_by_seven_days(offset in 0i64..40_000) {
        let date = epoch() + Duration::days(offset);
        assert_eq!(step_week(date, 1) - date, Duration::days(7));
        assert_eq!(date - step_week(date, -1), Duration::days(7));
    }

    #[test]
    fn prop_window_monday_resolves_back(offset in 0i64..40_000) {
        let date = epoch() + Duration::days(offset);
        let window = WeekWindow::for_date(date);
        let monday = window.monday().expect("derived windows are real ISO weeks");
        assert_eq!(WeekWindow::for_date(monday), window);
        assert!(monday <= date);
        assert!(date - monday < Duration::days(7));
    }

    #[test]
    fn prop_parse_hours_never_negative(raw in "\\PC{0,12}") {
        let hours = parse_hours(&raw);
        assert!(hours >= 0.0);
        assert!(hours.is_finite());
    }

    #[test]
    fn prop_day_hours_total_matches_field_sum(
        cells in proptest::collection::vec(0.0f64..24.0, 5)
    ) {
        let mut hours = DayHours::zero();
        for (day, value) in Workday::ALL.iter().zip(&cells) {
            hours.set(*day, *value);
        }
        let expected: f64 = cells.iter().sum();
        assert!((hours.total() - expected).abs() < 1e-9);
    }
}
