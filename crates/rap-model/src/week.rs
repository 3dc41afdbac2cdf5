//! The allocation week window
//!
//! ISO-8601 week numbering: the week containing the year's first Thursday
//! is week 1, so the week-year near January 1st can differ from the
//! calendar year. Total over all valid dates; there is no failure mode.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The (ISO week-year, ISO week number) pair scoping visible allocations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    /// ISO week-year (not always the calendar year of the date)
    pub year: i32,
    /// ISO week number, 1..=53
    pub week: u32,
}

impl WeekWindow {
    /// Create a window directly from a year/week pair
    #[inline]
    #[must_use]
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Resolve the window containing a calendar date
    #[inline]
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The Monday this window starts on, if the pair is a real ISO week
    #[inline]
    #[must_use]
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// True when an allocation's (year, week) pair falls in this window
    #[inline]
    #[must_use]
    pub fn matches(&self, year: i32, week: u32) -> bool {
        self.year == year && self.week == week
    }
}

impl std::fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{:02}/{}", self.week, self.year)
    }
}

/// Step a date by whole weeks
///
/// Returns `date + delta * 7 days`; the caller re-derives the window from
/// the result.
#[inline]
#[must_use]
pub fn step_week(date: NaiveDate, delta: i64) -> NaiveDate {
    date + Duration::weeks(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn mid_year_week_resolution() {
        let window = WeekWindow::for_date(d(2025, 3, 17));
        assert_eq!(window, WeekWindow::new(2025, 12));
    }

    #[test]
    fn january_can_belong_to_previous_week_year() {
        // 2027-01-01 is a Friday; the first Thursday of 2027 falls in the
        // following week, so it still counts as W53 of 2026.
        assert_eq!(WeekWindow::for_date(d(2027, 1, 1)), WeekWindow::new(2026, 53));
        assert_eq!(WeekWindow::for_date(d(2021, 1, 1)), WeekWindow::new(2020, 53));
        assert_eq!(WeekWindow::for_date(d(2016, 1, 1)), WeekWindow::new(2015, 53));
    }

    #[test]
    fn december_can_belong_to_next_week_year() {
        // Week containing the first Thursday of 2025 starts 2024-12-30.
        assert_eq!(WeekWindow::for_date(d(2024, 12, 30)), WeekWindow::new(2025, 1));
        assert_eq!(WeekWindow::for_date(d(2024, 12, 29)), WeekWindow::new(2024, 52));
    }

    #[test]
    fn first_thursday_rule_anchor() {
        // 2026-01-01 is itself a Thursday.
        assert_eq!(WeekWindow::for_date(d(2026, 1, 1)), WeekWindow::new(2026, 1));
    }

    #[test]
    fn step_week_crosses_year_boundary() {
        let stepped = step_week(d(2024, 12, 30), 1);
        assert_eq!(stepped, d(2025, 1, 6));
        assert_eq!(WeekWindow::for_date(stepped), WeekWindow::new(2025, 2));

        let back = step_week(stepped, -1);
        assert_eq!(back, d(2024, 12, 30));
    }

    #[test]
    fn window_monday_roundtrip() {
        let window = WeekWindow::new(2025, 12);
        assert_eq!(window.monday(), Some(d(2025, 3, 17)));
        assert_eq!(WeekWindow::for_date(window.monday().unwrap()), window);
    }

    #[test]
    fn window_display() {
        assert_eq!(WeekWindow::new(2025, 7).to_string(), "W07/2025");
    }
}
