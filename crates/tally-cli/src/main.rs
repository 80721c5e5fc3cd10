mod commands;

use std::path::PathBuf;
use std::sync::Once;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use tally_domain::RecurrencePattern;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track dated balance events and project day-by-day balance timelines")]
struct Cli {
    /// Path to the JSON event store (defaults to ~/.tally/tally.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new event, either one-off (--date) or recurring (--pattern)
    Add {
        /// Short description of the event
        description: String,

        /// Signed amount; positive credits, negative debits
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        /// Calendar date of a one-off event (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["pattern", "interval", "start", "end"])]
        date: Option<NaiveDate>,

        /// Recurrence pattern: daily, weekly, biweekly, monthly, quarterly or yearly
        #[arg(long)]
        pattern: Option<RecurrencePattern>,

        /// Repeat every N pattern steps (ignored by biweekly)
        #[arg(long, default_value_t = 1)]
        interval: u32,

        /// First occurrence of a recurring event (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last possible occurrence; omit for an open-ended series
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Free-form note
        #[arg(long)]
        comment: Option<String>,

        /// Label to attach; repeatable
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// List all stored events
    List,
    /// Update fields of an existing event
    Update {
        id: u64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        amount: Option<f64>,

        /// Turn the event into a one-off on this date
        #[arg(long, conflicts_with_all = ["pattern", "interval", "start", "end"])]
        date: Option<NaiveDate>,

        /// Turn the event into a recurring one (requires --start)
        #[arg(long)]
        pattern: Option<RecurrencePattern>,

        #[arg(long)]
        interval: Option<u32>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long)]
        comment: Option<String>,

        /// Replacement label set; repeatable
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Delete an event
    Remove { id: u64 },
    /// List labels across all events
    Labels {
        /// Show how many events carry each label
        #[arg(long)]
        counts: bool,
    },
    /// Rename a label on every event carrying it
    LabelRename { old: String, new: String },
    /// Remove a label from every event carrying it
    LabelDelete { name: String },
    /// Show or update stored query defaults
    Settings {
        #[arg(long, allow_hyphen_values = true)]
        starting_balance: Option<f64>,

        #[arg(long)]
        current_date: Option<NaiveDate>,
    },
    /// Project the balance timeline over a date window, printed as JSON
    Timeline {
        /// Window start (defaults to the stored current date, then today)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Window end (defaults to 60 days after the start)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Balance at the start of the window (defaults to the stored setting)
        #[arg(long, allow_hyphen_values = true)]
        starting_balance: Option<f64>,

        /// Only include events carrying at least one of these labels
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
}

/// Initializes the global tracing subscriber with sensible defaults.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env()
            .add_directive("tally_core=info".parse().unwrap())
            .add_directive("tally_storage_json=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
