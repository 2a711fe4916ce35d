//! Obras: a local-first registry for municipal urban-works projects.
//!
//! One SQLite file holds a reference catalog of lookup entities, the work
//! records that reference them, and nothing else. Three surfaces sit on
//! top of it:
//!
//! - **Bulk loading**: the city's works observatory CSV export is
//!   normalized row by row into the schema; bad rows are logged and
//!   skipped, never fatal.
//! - **Lifecycle**: an operator creates a record with minimal data and
//!   advances it through named transitions (project, contracting, award,
//!   begin, progress, term, labor, finalize/rescind), each persisting
//!   immediately.
//! - **Indicators**: read-only grouped counts, sums, and filtered lists
//!   over the accumulated records.
//!
//! # Crate structure
//!
//! - [`core`]: storage, catalogs, the work-record lifecycle, bulk loader,
//!   indicator queries, and pure input validation
//! - [`ingest`]: the CSV extraction shim
//! - `console` / `cli`: the blocking interactive shim and clap surface

pub mod core;
pub mod ingest;

mod cli;
mod console;

use crate::cli::{Cli, Command, OutputFormat, TransitionCommand};
use crate::core::{db, error, indicators, loader};
use clap::Parser;
use colored::Colorize;

pub fn run() -> Result<(), error::WorksError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => {
            let _conn = db::open(&cli.db)?;
            println!(
                "{} database ready at {}",
                "✔".green().bold(),
                cli.db.display()
            );
        }
        Command::Load { csv } => {
            let conn = db::open(&cli.db)?;
            let rows = ingest::extract_rows(&csv)?;
            if rows.is_empty() {
                println!("{} no rows found in {}", "⚠".yellow(), csv.display());
                return Ok(());
            }
            let outcome = loader::load(&conn, &rows)?;
            println!(
                "{} loaded {} work records ({} skipped)",
                "✔".green().bold(),
                outcome.inserted,
                outcome.skipped
            );
        }
        Command::New { minimal } => {
            let conn = db::open(&cli.db)?;
            console::new_work_flow(&conn, minimal)?;
        }
        Command::Work { id, transition } => {
            let conn = db::open(&cli.db)?;
            match transition {
                TransitionCommand::Project => console::transition_project(&conn, id)?,
                TransitionCommand::Contracting => console::transition_contracting(&conn, id)?,
                TransitionCommand::Award => console::transition_award(&conn, id)?,
                TransitionCommand::Begin => console::transition_begin(&conn, id)?,
                TransitionCommand::Progress => console::transition_progress(&conn, id)?,
                TransitionCommand::Term => console::transition_term(&conn, id)?,
                TransitionCommand::Labor => console::transition_labor(&conn, id)?,
                TransitionCommand::Finalize => console::transition_finalize(&conn, id)?,
                TransitionCommand::Rescind => console::transition_rescind(&conn, id)?,
            }
        }
        Command::Indicators { format } => {
            let conn = db::open(&cli.db)?;
            let report = indicators::gather(&conn)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report).map_err(
                        |e| error::WorksError::ValidationError(e.to_string()),
                    )?);
                }
                OutputFormat::Text => render_indicators(&report),
            }
        }
    }
    Ok(())
}

fn render_indicators(report: &indicators::Indicators) {
    println!("{}", "--- INDICATORS ---".bold());

    println!("\n{}", "Responsible areas:".cyan().bold());
    for area in &report.responsible_areas {
        println!("- {} | {}", area.id, area.value);
    }

    println!("\n{}", "Work types:".cyan().bold());
    for work_type in &report.work_types {
        println!("- {} | {}", work_type.id, work_type.value);
    }

    println!("\n{}", "Works by stage:".cyan().bold());
    for row in &report.works_by_stage {
        println!("- {} | {} works", row.stage, row.works);
    }

    println!("\n{}", "Works and total amount by type:".cyan().bold());
    for row in &report.totals_by_type {
        println!(
            "- {} | {} works | ${:.2}",
            row.work_type, row.works, row.total_amount
        );
    }

    println!("\n{}", "Neighborhoods in districts 1-3:".cyan().bold());
    for neighborhood in &report.central_neighborhoods {
        println!(
            "- {} (district {})",
            neighborhood.name, neighborhood.district_id
        );
    }

    println!(
        "\n{} {}",
        "Works finished within 24 periods:".cyan().bold(),
        report.finished_within_24
    );
    println!(
        "{} ${:.2}",
        "Total investment:".cyan().bold(),
        report.total_investment
    );
}
