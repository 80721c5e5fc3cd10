//! Recurrence rules and calendar-safe date advancement.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Enumerates the repetition cadences a recurring event can follow.
///
/// `Unknown` is the catch-all for pattern strings written by older versions
/// of the store. Records carrying it still load, but they stop generating
/// occurrences at the first advancement step.
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
    #[serde(other)]
    Unknown,
}

impl RecurrencePattern {
    /// Calculates the next date in the sequence, or `None` when the pattern
    /// is unrecognized and advancement must halt.
    ///
    /// Month-based cadences clamp the day-of-month to the target month's
    /// length, so Jan 31 plus one month lands on Feb 28 (or Feb 29 in a leap
    /// year) rather than rolling into March. `Biweekly` is a fixed two-week
    /// step; the interval is not consulted for it.
    pub fn advance(self, from: NaiveDate, interval: u32) -> Option<NaiveDate> {
        let next = match self {
            RecurrencePattern::Daily => from + Duration::days(interval as i64),
            RecurrencePattern::Weekly => from + Duration::weeks(interval as i64),
            RecurrencePattern::Biweekly => from + Duration::weeks(2),
            RecurrencePattern::Monthly => shift_month(from, interval as i32),
            RecurrencePattern::Quarterly => shift_month(from, 3 * interval as i32),
            RecurrencePattern::Yearly => shift_year(from, interval as i32),
            RecurrencePattern::Unknown => return None,
        };
        Some(next)
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Biweekly => "biweekly",
            RecurrencePattern::Monthly => "monthly",
            RecurrencePattern::Quarterly => "quarterly",
            RecurrencePattern::Yearly => "yearly",
            RecurrencePattern::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for RecurrencePattern {
    type Err = String;

    /// Parses user-supplied pattern names. Unlike deserialization, this
    /// rejects anything outside the supported set so new records cannot be
    /// created with a dead pattern.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "biweekly" => Ok(RecurrencePattern::Biweekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            "quarterly" => Ok(RecurrencePattern::Quarterly),
            "yearly" => Ok(RecurrencePattern::Yearly),
            other => Err(format!(
                "unknown recurrence pattern `{}` (expected daily, weekly, biweekly, monthly, quarterly or yearly)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Represents a recurrence rule attached to an event.
pub struct Recurrence {
    pub pattern: RecurrencePattern,
    #[serde(default = "Recurrence::default_interval")]
    pub interval: u32,
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(pattern: RecurrencePattern, start: NaiveDate) -> Self {
        Self {
            pattern,
            interval: 1,
            start,
            end: None,
        }
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn default_interval() -> u32 {
        1
    }

    /// Short human-readable cadence label for listings.
    pub fn label(&self) -> String {
        match (self.interval, self.pattern) {
            (_, RecurrencePattern::Biweekly) => "biweekly".into(),
            (1, pattern) => pattern.to_string(),
            (n, pattern) => format!("{} (every {})", pattern, n),
        }
    }
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let mut day = date.day();
    let month = date.month();
    day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}
