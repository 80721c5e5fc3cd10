//! Validation and window aggregation over the full event collection.

use tally_domain::{DateWindow, Event};

use crate::{expand_in_window, CoreError, Occurrence};

/// Checks the structural invariants an event must satisfy before it can
/// take part in occurrence generation: exactly one of a one-off date and a
/// recurrence rule, and a positive recurrence interval.
pub fn validate_event(event: &Event) -> Result<(), CoreError> {
    match (&event.event_date, &event.recurrence) {
        (Some(_), Some(_)) => Err(CoreError::Validation {
            id: event.id,
            reason: "carries both a one-off date and a recurrence rule".into(),
        }),
        (None, None) => Err(CoreError::Validation {
            id: event.id,
            reason: "has neither a one-off date nor a recurrence rule".into(),
        }),
        (None, Some(rule)) if rule.interval == 0 => Err(CoreError::Validation {
            id: event.id,
            reason: "recurrence interval must be positive".into(),
        }),
        _ => Ok(()),
    }
}

/// Merges one-off and expanded recurring events into a flat occurrence list
/// sorted by ascending date. The sort is stable, so same-day occurrences
/// keep the relative order of their source events.
///
/// `label_filter` of `None` (or an empty slice) matches every event;
/// otherwise an event is included when it shares at least one label with
/// the filter. Every event is validated up front and the whole query fails
/// on the first invalid record.
pub fn occurrences_in_window(
    events: &[Event],
    window: DateWindow,
    label_filter: Option<&[String]>,
) -> Result<Vec<Occurrence>, CoreError> {
    for event in events {
        validate_event(event)?;
    }

    let filter = label_filter.filter(|labels| !labels.is_empty());
    let mut occurrences = Vec::new();
    for event in events {
        if let Some(wanted) = filter {
            if !event.has_any_label(wanted) {
                continue;
            }
        }
        match (&event.recurrence, event.event_date) {
            (Some(rule), _) => occurrences.extend(expand_in_window(event, rule, window)),
            (None, Some(date)) if window.contains(date) => {
                occurrences.push(Occurrence::from_event(event, date));
            }
            _ => {}
        }
    }

    occurrences.sort_by_key(|occ| occ.date);
    Ok(occurrences)
}
