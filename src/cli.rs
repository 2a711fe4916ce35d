//! CLI struct definitions. Dispatch logic lives in `lib.rs::run`.

use crate::core::schemas;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "obras",
    version = env!("CARGO_PKG_VERSION"),
    about = "Local-first registry and reporting CLI for municipal urban-works projects."
)]
pub(crate) struct Cli {
    /// Path to the SQLite database file.
    #[clap(long, global = true, default_value = schemas::WORKS_DB_NAME)]
    pub db: PathBuf,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the database schema (idempotent).
    Init,
    /// Bulk-load work records from a works observatory CSV export.
    Load {
        /// Path to the `;`-delimited CSV file.
        #[clap(long)]
        csv: PathBuf,
    },
    /// Interactively create a work record and walk its lifecycle.
    New {
        /// Stop after the minimal record instead of walking every transition.
        #[clap(long)]
        minimal: bool,
    },
    /// Run one lifecycle transition against an existing work record.
    Work {
        /// Work record id.
        #[clap(value_name = "ID")]
        id: i64,
        #[clap(subcommand)]
        transition: TransitionCommand,
    },
    /// Compute and print the aggregate indicators.
    Indicators {
        /// Output format for the report.
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub(crate) enum TransitionCommand {
    /// Assign the "Project" stage.
    Project,
    /// Record contracting type, amount, and contract number.
    Contracting,
    /// Award the work to an existing contractor.
    Award,
    /// Record dates, financing, featured flag, and labor.
    Begin,
    /// Update the progress percentage.
    Progress,
    /// Extend the term.
    Term,
    /// Update the labor headcount.
    Labor,
    /// Mark the work finished (terminal).
    Finalize,
    /// Mark the work rescinded (terminal).
    Rescind,
}
