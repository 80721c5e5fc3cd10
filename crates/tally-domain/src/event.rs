//! Domain models for balance events and partial updates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recurrence::Recurrence;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A dated financial event. Exactly one of `event_date` (one-off) and
/// `recurrence` (recurring) is set; the store rejects records violating
/// this before they are persisted.
pub struct Event {
    pub id: u64,
    pub description: String,
    /// Positive amounts are credits, negative amounts are debits.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Event {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Returns true when any of the event's labels appears in `filter`.
    pub fn has_any_label(&self, filter: &[String]) -> bool {
        filter
            .iter()
            .any(|wanted| self.labels.iter().any(|have| have == wanted))
    }

    /// Applies a partial update. Assigning a schedule field switches the
    /// event's kind: setting `event_date` clears any recurrence and setting
    /// `recurrence` clears any one-off date, so a patched event never ends
    /// up with both.
    pub fn apply_patch(&mut self, patch: EventPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.event_date {
            self.event_date = Some(date);
            self.recurrence = None;
        }
        if let Some(recurrence) = patch.recurrence {
            self.recurrence = Some(recurrence);
            self.event_date = None;
        }
        if let Some(comment) = patch.comment {
            self.comment = Some(comment);
        }
        if let Some(labels) = patch.labels {
            self.labels = labels;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Field-by-field update for an existing event. Absent fields are left
/// untouched; the set of updatable fields is fixed by this struct rather
/// than checked against an allow-list at runtime.
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.event_date.is_none()
            && self.recurrence.is_none()
            && self.comment.is_none()
            && self.labels.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A new event awaiting an identifier from the store.
pub struct EventDraft {
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl EventDraft {
    pub fn one_off(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            event_date: Some(date),
            recurrence: None,
            comment: None,
            labels: Vec::new(),
        }
    }

    pub fn recurring(description: impl Into<String>, amount: f64, recurrence: Recurrence) -> Self {
        Self {
            description: description.into(),
            amount,
            event_date: None,
            recurrence: Some(recurrence),
            comment: None,
            labels: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn into_event(self, id: u64) -> Event {
        Event {
            id,
            description: self.description,
            amount: self.amount,
            event_date: self.event_date,
            recurrence: self.recurrence,
            comment: self.comment,
            labels: self.labels,
        }
    }
}
