//! Storage abstraction the timeline engine reads events through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_domain::{Event, EventDraft, EventPatch};

use crate::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Persisted query defaults.
pub struct Settings {
    pub starting_balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_date: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_balance: 1000.0,
            current_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A label name together with the number of events carrying it.
pub struct LabelCount {
    pub name: String,
    pub count: usize,
}

/// Abstraction over persistence backends for events, labels and settings.
///
/// Implementations hand the engine a consistent snapshot per query and are
/// responsible for serializing writes; the engine itself never mutates
/// stored state.
pub trait EventStore: Send + Sync {
    /// Full event collection with resolved label sets.
    fn events(&self) -> Result<Vec<Event>, CoreError>;
    /// Persists a new event, assigning and returning its identifier.
    /// Invalid drafts are rejected and nothing is written.
    fn add_event(&self, draft: EventDraft) -> Result<u64, CoreError>;
    /// Applies a partial update; the patched record is validated before it
    /// replaces the stored one.
    fn update_event(&self, id: u64, patch: EventPatch) -> Result<(), CoreError>;
    fn delete_event(&self, id: u64) -> Result<(), CoreError>;

    /// Distinct label names across all events, sorted.
    fn labels(&self) -> Result<Vec<String>, CoreError>;
    fn labels_with_counts(&self) -> Result<Vec<LabelCount>, CoreError>;
    /// Renames a label on every event carrying it.
    fn rename_label(&self, old: &str, new: &str) -> Result<(), CoreError>;
    /// Removes a label from every event carrying it.
    fn delete_label(&self, name: &str) -> Result<(), CoreError>;

    fn settings(&self) -> Result<Settings, CoreError>;
    fn update_settings(&self, settings: Settings) -> Result<(), CoreError>;
}
