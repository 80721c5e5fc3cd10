//! tally-core
//!
//! Business logic for balance timelines: recurring-event expansion, event
//! aggregation over a query window, and day-by-day balance accumulation.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct storage
//! interactions.

pub mod error;
pub mod event_service;
pub mod recurrence_service;
pub mod storage;
pub mod timeline_service;

pub use error::CoreError;
pub use event_service::*;
pub use recurrence_service::*;
pub use storage::*;
pub use timeline_service::*;
