//! Expansion of recurring events into concrete dated occurrences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use tally_domain::{DateWindow, Event, Recurrence};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A single concrete instance of an event's effect on the balance.
/// Derived fresh on every query, never persisted.
pub struct Occurrence {
    pub id: u64,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub comment: Option<String>,
    pub is_recurring: bool,
    pub labels: Vec<String>,
}

impl Occurrence {
    pub fn from_event(event: &Event, date: NaiveDate) -> Self {
        Self {
            id: event.id,
            description: event.description.clone(),
            amount: event.amount,
            date,
            comment: event.comment.clone(),
            is_recurring: event.is_recurring(),
            labels: event.labels.clone(),
        }
    }
}

/// Expands one recurring event into its occurrences inside `window`.
///
/// The effective bound is the earlier of the rule's own end date and the
/// window end, so unbounded rules are clipped to the query. Dates before the
/// window are skipped by walking the cadence forward without materializing
/// them. Output is strictly increasing by date.
///
/// An unrecognized pattern halts advancement: whatever was emitted up to
/// that point stands, and the series ends there. Legacy records must not
/// take the whole timeline down with them.
pub fn expand_in_window(event: &Event, rule: &Recurrence, window: DateWindow) -> Vec<Occurrence> {
    let effective_end = rule.end.map_or(window.end, |end| end.min(window.end));
    let mut occurrences = Vec::new();
    if rule.start > effective_end {
        return occurrences;
    }

    let mut cursor = rule.start;
    while cursor < window.start && cursor <= effective_end {
        match rule.pattern.advance(cursor, rule.interval) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    while cursor <= effective_end {
        if cursor >= window.start {
            occurrences.push(Occurrence::from_event(event, cursor));
        }
        match rule.pattern.advance(cursor, rule.interval) {
            Some(next) => cursor = next,
            None => {
                warn!(
                    "event {} has an unrecognized recurrence pattern; expansion halted",
                    event.id
                );
                break;
            }
        }
    }

    occurrences
}
