//! Day-by-day balance accumulation over a query window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_domain::{DateWindow, Event};

use crate::{occurrences_in_window, CoreError, Occurrence};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Balance as of the end of one calendar day.
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of a timeline query: one point per day of the window, the flat
/// occurrence list that produced it, and the boundary balances.
pub struct TimelineReport {
    pub timeline: Vec<TimelinePoint>,
    pub occurrences: Vec<Occurrence>,
    pub starting_balance: f64,
    pub ending_balance: f64,
}

/// Projects the balance day by day across `[start, end]` inclusive.
///
/// Every calendar day in the window gets a point even when nothing happens
/// on it. The running balance is carried at full precision between days and
/// each occurrence's amount is added to it one at a time, in occurrence
/// order; rounding to two decimals happens only on the emitted points and
/// the ending balance. A deterministic pure function of its inputs.
pub fn compute_timeline(
    events: &[Event],
    start: NaiveDate,
    end: NaiveDate,
    starting_balance: f64,
    label_filter: Option<&[String]>,
) -> Result<TimelineReport, CoreError> {
    let window = DateWindow::new(start, end).ok_or(CoreError::InvalidWindow { start, end })?;
    let occurrences = occurrences_in_window(events, window, label_filter)?;
    debug!(
        "computing timeline over {} days with {} occurrences",
        window.days(),
        occurrences.len()
    );

    let mut timeline = Vec::with_capacity(window.days() as usize);
    let mut balance = starting_balance;
    let mut next = 0;
    for day in window.iter_days() {
        // Occurrences are sorted by date, so each day's share is a
        // contiguous run. Amounts are applied one by one, not pre-summed.
        while next < occurrences.len() && occurrences[next].date == day {
            balance += occurrences[next].amount;
            next += 1;
        }
        timeline.push(TimelinePoint {
            date: day,
            balance: round2(balance),
        });
    }

    let ending_balance = timeline
        .last()
        .map_or(round2(starting_balance), |point| point.balance);

    Ok(TimelineReport {
        timeline,
        occurrences,
        starting_balance,
        ending_balance,
    })
}

/// Presentation rounding to two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
