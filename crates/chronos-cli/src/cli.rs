//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::edit::EditArgs;
use crate::commands::start::StartArgs;

/// Manual time tracker.
///
/// Log work against named tasks and categories, see totals that count
/// overlapping time once, and copy quarter-hour rounded hours for billing.
#[derive(Debug, Parser)]
#[command(name = "chronos", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Timesheet ID or unique prefix (defaults to the newest timesheet).
    #[arg(short, long, global = true)]
    pub sheet: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a task, or log a finished one with --end or --duration.
    Start(StartArgs),

    /// Stop a running entry (all running entries when no ID is given).
    Stop {
        /// Entry ID or unique prefix.
        id: Option<String>,
    },

    /// Start a new entry with the same name and category as an existing one.
    Restart {
        /// Entry ID or unique prefix.
        id: String,
    },

    /// Delete an entry.
    Rm {
        /// Entry ID or unique prefix.
        id: String,
    },

    /// Change an entry's name, category or times.
    Edit(EditArgs),

    /// List entries in the timesheet.
    List,

    /// Show time per category and task, with overlap-aware totals.
    Summary {
        /// Output as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print rounded hours per category, ready to paste into a timesheet.
    Copy,

    /// List every category in use.
    Categories {
        /// Output as JSON, including each category's colours.
        #[arg(long)]
        json: bool,
    },

    /// Manage timesheets.
    #[command(subcommand)]
    Sheets(SheetsAction),
}

/// Timesheet subcommands.
#[derive(Debug, Subcommand)]
pub enum SheetsAction {
    /// List timesheets, newest first.
    List,

    /// Create a timesheet (named after today's date by default).
    New {
        /// Name for the timesheet.
        name: Option<String>,
    },

    /// Rename a timesheet.
    Rename {
        /// Timesheet ID or unique prefix.
        id: String,
        /// New name.
        name: String,
    },

    /// Delete a timesheet and all of its entries.
    Delete {
        /// Timesheet ID or unique prefix.
        id: String,
    },
}
