//! Hour aggregation
//!
//! Totals recompute from whatever the grid currently holds, so optimistic
//! local edits are reflected before the store confirms them.

use rap_model::{DayHours, ResourceAllocation, Workday};
use serde::Serialize;

/// Per-day column totals and the grand total
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GridTotals {
    /// Sum per weekday column
    pub per_day: DayHours,
    /// Sum of every cell
    pub grand: f64,
}

impl GridTotals {
    /// Sum a set of allocation rows
    #[must_use]
    pub fn of<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceAllocation>,
    {
        let mut per_day = DayHours::zero();
        for row in rows {
            per_day.add(&row.hours);
        }
        Self {
            grand: per_day.total(),
            per_day,
        }
    }

    /// Column total for one weekday
    #[inline]
    #[must_use]
    pub fn day(&self, day: Workday) -> f64 {
        self.per_day.get(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rap_model::{EmployeeId, ProjectId, WeekWindow};

    fn row_with(hours: [f64; 5]) -> ResourceAllocation {
        let mut row = ResourceAllocation::new(
            EmployeeId::new(),
            ProjectId::new(),
            WeekWindow::new(2025, 12),
        );
        for (day, value) in Workday::ALL.into_iter().zip(hours) {
            row.hours.set(day, value);
        }
        row
    }

    #[test]
    fn totals_sum_rows_per_day_and_grand() {
        let rows = vec![
            row_with([4.0, 0.0, 2.0, 0.0, 0.0]),
            row_with([1.5, 3.0, 0.0, 0.0, 8.0]),
        ];

        let totals = GridTotals::of(&rows);
        assert_eq!(totals.day(Workday::Monday), 5.5);
        assert_eq!(totals.day(Workday::Tuesday), 3.0);
        assert_eq!(totals.day(Workday::Wednesday), 2.0);
        assert_eq!(totals.day(Workday::Friday), 8.0);
        assert_eq!(totals.grand, 18.5);
    }

    #[test]
    fn empty_grid_totals_zero() {
        let totals = GridTotals::of(std::iter::empty());
        assert_eq!(totals.grand, 0.0);
        assert!(totals.per_day.is_zero());
    }
}
