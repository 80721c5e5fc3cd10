//! tally-domain
//!
//! Data model for balance events: one-off and recurring event records,
//! recurrence rules with calendar-safe date advancement, and inclusive
//! date windows. No I/O and no business services.

pub mod event;
pub mod recurrence;
pub mod window;

pub use event::{Event, EventDraft, EventPatch};
pub use recurrence::{Recurrence, RecurrencePattern};
pub use window::DateWindow;
