//! Maps parsed CLI commands onto store mutations and timeline queries.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate, Utc};

use tally_core::{compute_timeline, EventStore};
use tally_domain::{Event, EventDraft, EventPatch, Recurrence, RecurrencePattern};
use tally_storage_json::JsonEventStore;

use crate::{Cli, Commands};

pub fn run(cli: Cli) -> Result<()> {
    let store = open_store(cli.store)?;

    match cli.command {
        Commands::Add {
            description,
            amount,
            date,
            pattern,
            interval,
            start,
            end,
            comment,
            labels,
        } => {
            let mut draft = match (date, pattern) {
                (Some(date), None) => EventDraft::one_off(description, amount, date),
                (None, Some(pattern)) => {
                    let rule = build_rule(pattern, Some(interval), start, end)?;
                    EventDraft::recurring(description, amount, rule)
                }
                (None, None) | (Some(_), Some(_)) => {
                    bail!("exactly one of --date and --pattern is required")
                }
            };
            if let Some(comment) = comment {
                draft = draft.with_comment(comment);
            }
            let draft = draft.with_labels(labels);
            let id = store.add_event(draft)?;
            println!("Added event {id}");
        }
        Commands::List => {
            let events = store.events()?;
            if events.is_empty() {
                println!("No events recorded.");
            }
            for event in events {
                println!("{}", format_event(&event));
            }
        }
        Commands::Update {
            id,
            description,
            amount,
            date,
            pattern,
            interval,
            start,
            end,
            comment,
            labels,
        } => {
            let recurrence = match pattern {
                Some(pattern) => Some(build_rule(pattern, interval, start, end)?),
                None => {
                    if interval.is_some() || start.is_some() || end.is_some() {
                        bail!("--interval, --start and --end require --pattern");
                    }
                    None
                }
            };
            let patch = EventPatch {
                description,
                amount,
                event_date: date,
                recurrence,
                comment,
                labels: if labels.is_empty() { None } else { Some(labels) },
            };
            if patch.is_empty() {
                bail!("nothing to update");
            }
            store.update_event(id, patch)?;
            println!("Updated event {id}");
        }
        Commands::Remove { id } => {
            store.delete_event(id)?;
            println!("Removed event {id}");
        }
        Commands::Labels { counts } => {
            if counts {
                for label in store.labels_with_counts()? {
                    println!("{} ({})", label.name, label.count);
                }
            } else {
                for name in store.labels()? {
                    println!("{name}");
                }
            }
        }
        Commands::LabelRename { old, new } => {
            store.rename_label(&old, &new)?;
            println!("Renamed label `{old}` to `{new}`");
        }
        Commands::LabelDelete { name } => {
            store.delete_label(&name)?;
            println!("Deleted label `{name}`");
        }
        Commands::Settings {
            starting_balance,
            current_date,
        } => {
            let mut settings = store.settings()?;
            if starting_balance.is_some() || current_date.is_some() {
                if let Some(balance) = starting_balance {
                    settings.starting_balance = balance;
                }
                if let Some(date) = current_date {
                    settings.current_date = Some(date);
                }
                store.update_settings(settings.clone())?;
            }
            println!("starting_balance: {:.2}", settings.starting_balance);
            match settings.current_date {
                Some(date) => println!("current_date: {date}"),
                None => println!("current_date: (today)"),
            }
        }
        Commands::Timeline {
            from,
            to,
            starting_balance,
            labels,
        } => {
            let settings = store.settings()?;
            let from = from
                .or(settings.current_date)
                .unwrap_or_else(|| Utc::now().date_naive());
            // Two months ahead by default.
            let to = to.unwrap_or(from + Duration::days(60));
            let starting = starting_balance.unwrap_or(settings.starting_balance);
            let filter = (!labels.is_empty()).then_some(labels.as_slice());

            let report = compute_timeline(&store.events()?, from, to, starting, filter)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<JsonEventStore> {
    let path = match path {
        Some(path) => path,
        None => dirs::home_dir()
            .map(|home| home.join(".tally").join("tally.json"))
            .ok_or_else(|| anyhow::anyhow!("could not determine a home directory; pass --store"))?,
    };
    Ok(JsonEventStore::new(path)?)
}

fn build_rule(
    pattern: RecurrencePattern,
    interval: Option<u32>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Recurrence> {
    let Some(start) = start else {
        bail!("--start is required for recurring events");
    };
    let mut rule = Recurrence::new(pattern, start);
    if let Some(interval) = interval {
        rule = rule.every(interval);
    }
    if let Some(end) = end {
        rule = rule.until(end);
    }
    Ok(rule)
}

fn format_event(event: &Event) -> String {
    let schedule = match (&event.recurrence, event.event_date) {
        (Some(rule), _) => {
            let mut label = format!("{} from {}", rule.label(), rule.start);
            if let Some(end) = rule.end {
                label.push_str(&format!(" until {end}"));
            }
            label
        }
        (None, Some(date)) => format!("on {date}"),
        (None, None) => "unscheduled".to_string(),
    };
    let mut line = format!(
        "[{:>3}] {:<24} {:>10.2}  {}",
        event.id, event.description, event.amount, schedule
    );
    for label in &event.labels {
        line.push_str(&format!(" #{label}"));
    }
    if let Some(comment) = &event.comment {
        line.push_str(&format!("  ({comment})"));
    }
    line
}
