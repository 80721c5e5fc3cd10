//! Inclusive calendar-date query windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A query window covering every calendar day from `start` to `end`,
/// both endpoints included. A window of a single day is valid.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, endpoints included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
