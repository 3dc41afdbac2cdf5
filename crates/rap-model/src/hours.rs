//! Workdays and day-hour fields
//!
//! The grid edits Monday through Friday independently; hours are fractional
//! and never negative.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A weekday column of the planner grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Workday {
    /// All workday columns in grid order
    pub const ALL: [Workday; 5] = [
        Workday::Monday,
        Workday::Tuesday,
        Workday::Wednesday,
        Workday::Thursday,
        Workday::Friday,
    ];

    /// Field name as persisted ("monday".."friday")
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Workday::Monday => "monday",
            Workday::Tuesday => "tuesday",
            Workday::Wednesday => "wednesday",
            Workday::Thursday => "thursday",
            Workday::Friday => "friday",
        }
    }
}

impl std::fmt::Display for Workday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workday {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(Workday::Monday),
            "tuesday" => Ok(Workday::Tuesday),
            "wednesday" => Ok(Workday::Wednesday),
            "thursday" => Ok(Workday::Thursday),
            "friday" => Ok(Workday::Friday),
            other => Err(ParseError::UnknownWorkday(other.to_string())),
        }
    }
}

/// The five day-hour fields of an allocation
///
/// Defaults to all zeros. Setters clamp negatives to 0; a zero cell is
/// numerically identical to an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayHours {
    pub monday: f64,
    pub tuesday: f64,
    pub wednesday: f64,
    pub thursday: f64,
    pub friday: f64,
}

impl DayHours {
    /// All-zero hours
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Hours for one workday
    #[inline]
    #[must_use]
    pub fn get(&self, day: Workday) -> f64 {
        match day {
            Workday::Monday => self.monday,
            Workday::Tuesday => self.tuesday,
            Workday::Wednesday => self.wednesday,
            Workday::Thursday => self.thursday,
            Workday::Friday => self.friday,
        }
    }

    /// Set hours for one workday, clamping negatives to 0
    #[inline]
    pub fn set(&mut self, day: Workday, hours: f64) {
        let hours = if hours.is_finite() && hours > 0.0 {
            hours
        } else {
            0.0
        };
        match day {
            Workday::Monday => self.monday = hours,
            Workday::Tuesday => self.tuesday = hours,
            Workday::Wednesday => self.wednesday = hours,
            Workday::Thursday => self.thursday = hours,
            Workday::Friday => self.friday = hours,
        }
    }

    /// Accumulate another week of hours field-wise
    #[inline]
    pub fn add(&mut self, other: &DayHours) {
        self.monday += other.monday;
        self.tuesday += other.tuesday;
        self.wednesday += other.wednesday;
        self.thursday += other.thursday;
        self.friday += other.friday;
    }

    /// Sum across all five days
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.monday + self.tuesday + self.wednesday + self.thursday + self.friday
    }

    /// True when every day is zero
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total() == 0.0
    }
}

/// Parse a raw hour-cell buffer into hours
///
/// Accepts a comma decimal separator alongside the dot. Anything
/// non-numeric, non-finite, or negative coerces to 0.0 rather than
/// failing the commit.
#[must_use]
pub fn parse_hours(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', ".");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h >= 0.0)
        .unwrap_or(0.0)
}
