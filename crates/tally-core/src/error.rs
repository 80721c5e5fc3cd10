use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("Invalid event {id}: {reason}")]
    Validation { id: u64, reason: String },
    #[error("Event not found: {0}")]
    EventNotFound(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}
