//! Filesystem-backed JSON persistence for events, labels and settings.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tally_core::{CoreError, EventStore, LabelCount, Settings};
use tally_domain::{Event, EventDraft, EventPatch};

const TMP_SUFFIX: &str = "tmp";

/// Single-file JSON record store. Every mutation loads the document,
/// applies the change and rewrites the file atomically (tmp file plus
/// rename), so readers never observe a partially-written store.
#[derive(Debug, Clone)]
pub struct JsonEventStore {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    settings: Settings,
}

fn first_id() -> u64 {
    1
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            events: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl JsonEventStore {
    /// Opens a store at `path`, creating the parent directory if needed.
    /// A missing file reads as an empty store; it is only created on the
    /// first write.
    pub fn new(path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> Result<StoreDocument, CoreError> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let document: StoreDocument =
            serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        debug!(
            "loaded {} events from {}",
            document.events.len(),
            self.path.display()
        );
        Ok(document)
    }

    fn save_document(&self, document: &StoreDocument) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EventStore for JsonEventStore {
    fn events(&self) -> Result<Vec<Event>, CoreError> {
        Ok(self.load_document()?.events)
    }

    fn add_event(&self, draft: EventDraft) -> Result<u64, CoreError> {
        let mut document = self.load_document()?;
        let id = document.next_id;
        let event = draft.into_event(id);
        tally_core::validate_event(&event)?;
        document.next_id += 1;
        document.events.push(event);
        self.save_document(&document)?;
        Ok(id)
    }

    fn update_event(&self, id: u64, patch: EventPatch) -> Result<(), CoreError> {
        let mut document = self.load_document()?;
        let event = document
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or(CoreError::EventNotFound(id))?;
        let mut updated = event.clone();
        updated.apply_patch(patch);
        tally_core::validate_event(&updated)?;
        *event = updated;
        self.save_document(&document)
    }

    fn delete_event(&self, id: u64) -> Result<(), CoreError> {
        let mut document = self.load_document()?;
        let before = document.events.len();
        document.events.retain(|event| event.id != id);
        if document.events.len() == before {
            return Err(CoreError::EventNotFound(id));
        }
        self.save_document(&document)
    }

    fn labels(&self) -> Result<Vec<String>, CoreError> {
        let document = self.load_document()?;
        let names: BTreeSet<String> = document
            .events
            .iter()
            .flat_map(|event| event.labels.iter().cloned())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn labels_with_counts(&self) -> Result<Vec<LabelCount>, CoreError> {
        let document = self.load_document()?;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for event in &document.events {
            for label in &event.labels {
                *counts.entry(label.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| LabelCount { name, count })
            .collect())
    }

    fn rename_label(&self, old: &str, new: &str) -> Result<(), CoreError> {
        let mut document = self.load_document()?;
        for event in &mut document.events {
            for label in &mut event.labels {
                if label == old {
                    *label = new.to_string();
                }
            }
            // Renaming onto an existing label must not leave duplicates.
            let mut seen = HashSet::new();
            event.labels.retain(|label| seen.insert(label.clone()));
        }
        self.save_document(&document)
    }

    fn delete_label(&self, name: &str) -> Result<(), CoreError> {
        let mut document = self.load_document()?;
        for event in &mut document.events {
            event.labels.retain(|label| label != name);
        }
        self.save_document(&document)
    }

    fn settings(&self) -> Result<Settings, CoreError> {
        Ok(self.load_document()?.settings)
    }

    fn update_settings(&self, settings: Settings) -> Result<(), CoreError> {
        let mut document = self.load_document()?;
        document.settings = settings;
        self.save_document(&document)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
