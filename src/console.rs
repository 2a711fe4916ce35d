//! Blocking console shim for the interactive flows.
//!
//! All retry policy lives here: every malformed scalar re-prompts, a
//! catalog miss without creation consent loops back to the prompt, and an
//! unknown contractor during award forces another attempt. The core never
//! blocks on input.

use crate::core::catalog::{self, CatalogEntry, CatalogKind, Contractor, Neighborhood};
use crate::core::error::WorksError;
use crate::core::input;
use crate::core::record::{self, NewWork};
use chrono::NaiveDate;
use colored::Colorize;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

fn read_line(prompt: &str) -> Result<String, WorksError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        // Stdin closed; an indefinite re-prompt loop would spin forever.
        return Err(WorksError::IoError(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "console input closed",
        )));
    }
    Ok(line.trim().to_string())
}

fn reject(err: &WorksError) {
    println!("{} {}", "✗".red().bold(), err);
}

pub fn prompt_text(prompt: &str) -> Result<String, WorksError> {
    read_line(prompt)
}

pub fn prompt_date(prompt: &str) -> Result<NaiveDate, WorksError> {
    loop {
        match input::parse_date_input(&read_line(prompt)?) {
            Ok(date) => return Ok(date),
            Err(err) => reject(&err),
        }
    }
}

pub fn prompt_float(prompt: &str) -> Result<f64, WorksError> {
    loop {
        match input::parse_float_input(&read_line(prompt)?) {
            Ok(value) => return Ok(value),
            Err(err) => reject(&err),
        }
    }
}

pub fn prompt_progress(prompt: &str) -> Result<f64, WorksError> {
    loop {
        match input::parse_progress_input(&read_line(prompt)?) {
            Ok(value) => return Ok(value),
            Err(err) => reject(&err),
        }
    }
}

pub fn prompt_headcount(prompt: &str) -> Result<i64, WorksError> {
    loop {
        match input::parse_headcount_input(&read_line(prompt)?) {
            Ok(value) => return Ok(value),
            Err(err) => reject(&err),
        }
    }
}

pub fn prompt_yes_no(prompt: &str) -> Result<bool, WorksError> {
    loop {
        match input::parse_yes_no(&read_line(&format!("{prompt} (SI/NO): "))?) {
            Ok(value) => return Ok(value),
            Err(err) => reject(&err),
        }
    }
}

/// Resolve a catalog value with operator consent: list the options, look
/// up the entered text, and on a miss ask whether to create it. Declining
/// loops back to the prompt; nothing is fabricated silently.
pub fn resolve_catalog(
    conn: &Connection,
    kind: CatalogKind,
    prompt: &str,
) -> Result<CatalogEntry, WorksError> {
    loop {
        println!("\nAvailable {}s:", kind.label());
        for entry in catalog::list(conn, kind)? {
            println!("- {}", entry.value);
        }
        let value = read_line(prompt)?;
        if value.is_empty() {
            continue;
        }
        if let Some(entry) = catalog::find(conn, kind, &value)? {
            return Ok(entry);
        }
        if prompt_yes_no(&format!("'{value}' does not exist. Create it?"))? {
            let entry = catalog::create(conn, kind, &value)?;
            println!("{} new {} created: {}", "✔".green(), kind.label(), value);
            return Ok(entry);
        }
        println!("{} nothing created, try again.", "✗".red());
    }
}

/// Neighborhood resolution; creating one first resolves (or creates) its
/// district.
pub fn resolve_neighborhood(conn: &Connection) -> Result<Neighborhood, WorksError> {
    loop {
        println!("\nAvailable neighborhoods:");
        let mut stmt = conn.prepare("SELECT name FROM neighborhoods ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for name in names {
            println!("- {name}");
        }
        let value = read_line("Enter the work's neighborhood: ")?;
        if value.is_empty() {
            continue;
        }
        if let Some(existing) = catalog::find_neighborhood(conn, &value)? {
            return Ok(existing);
        }
        if prompt_yes_no(&format!("'{value}' does not exist. Create it?"))? {
            let district =
                resolve_catalog(conn, CatalogKind::District, "Enter the new neighborhood's district: ")?;
            let neighborhood = catalog::create_neighborhood(conn, &value, district.id)?;
            println!("{} new neighborhood created: {}", "✔".green(), value);
            return Ok(neighborhood);
        }
        println!("{} nothing created, try again.", "✗".red());
    }
}

/// Awarding requires an existing contractor; there is no create path here.
pub fn choose_contractor(conn: &Connection) -> Result<Contractor, WorksError> {
    loop {
        println!("\nRegistered contractors:");
        for contractor in catalog::list_contractors(conn)? {
            println!("- {}", contractor.company_name);
        }
        let name = read_line("Enter a contractor from the list: ")?;
        match catalog::find_contractor(conn, &name)? {
            Some(contractor) => return Ok(contractor),
            None => println!(
                "{} contractor not found, enter one from the list.",
                "✗".red()
            ),
        }
    }
}

fn step(label: &str) {
    println!("\n{} {}", "▸".cyan().bold(), label.bold());
}

pub fn transition_project(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Stage: new project");
    record::start_new_project(conn, id)?;
    println!("{} stage set to '{}'.", "✔".green(), catalog::STAGE_PROJECT);
    Ok(())
}

pub fn transition_contracting(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Starting contracting");
    let contracting_type =
        resolve_catalog(conn, CatalogKind::ContractingType, "Enter contracting type: ")?;
    // Raw text on purpose; this layer never validated the amount.
    let amount = prompt_text("Enter contract amount: ")?;
    let number = prompt_text("Enter contract number: ")?;
    record::start_contracting(conn, id, contracting_type.id, &amount, &number)?;
    println!("{} contracting recorded.", "✔".green());
    Ok(())
}

pub fn transition_award(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Awarding work");
    let contractor = choose_contractor(conn)?;
    let file_number = prompt_text("Enter file number: ")?;
    record::award(conn, id, &contractor.company_name, &file_number)?;
    println!("{} work awarded to {}.", "✔".green(), contractor.company_name);
    Ok(())
}

pub fn transition_begin(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Beginning work");
    let featured = prompt_yes_no("Is the work featured?")?;
    let start = prompt_date("Enter start date (YYYY-MM-DD): ")?;
    let end = prompt_date("Enter estimated end date (YYYY-MM-DD): ")?;
    let financing = resolve_catalog(conn, CatalogKind::Financing, "Enter financing: ")?;
    let headcount = prompt_headcount("Enter people working on site: ")?;
    record::begin_work(conn, id, featured, start, end, financing.id, headcount)?;
    println!(
        "{} work started (featured: {}).",
        "✔".green(),
        input::canonical_yes_no(featured)
    );
    Ok(())
}

pub fn transition_progress(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Updating progress");
    let progress = prompt_progress("Enter progress percentage (e.g. 42.5): ")?;
    record::update_progress(conn, id, progress)?;
    println!("{} progress updated to {progress}%.", "✔".green());
    Ok(())
}

pub fn transition_term(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Extending term");
    let term = prompt_float("Enter term (in days): ")?;
    record::extend_term(conn, id, term)?;
    println!("{} term updated to {term} days.", "✔".green());
    Ok(())
}

pub fn transition_labor(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Updating labor");
    let headcount = prompt_headcount("Enter new labor headcount: ")?;
    record::update_labor(conn, id, headcount)?;
    println!("{} labor updated to {headcount} people.", "✔".green());
    Ok(())
}

pub fn transition_finalize(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Finalizing work");
    record::finalize(conn, id)?;
    println!("{} work marked as finished.", "✔".green());
    Ok(())
}

pub fn transition_rescind(conn: &Connection, id: i64) -> Result<(), WorksError> {
    step("Rescinding work");
    record::rescind(conn, id)?;
    println!("{} work marked as rescinded.", "✔".green());
    Ok(())
}

/// Interactive creation: minimal attributes first, then (unless `minimal`)
/// a guided walk through the lifecycle.
pub fn new_work_flow(conn: &Connection, minimal: bool) -> Result<i64, WorksError> {
    println!("{}", "Creating a new work record (basic data)".bold());

    let environment =
        resolve_catalog(conn, CatalogKind::Environment, "Enter the work's environment: ")?;
    let name = prompt_text("Enter the work's name: ")?;
    let work_type = resolve_catalog(conn, CatalogKind::WorkType, "Enter the work type: ")?;
    let area = resolve_catalog(
        conn,
        CatalogKind::ResponsibleArea,
        "Enter the responsible area: ",
    )?;
    let description = prompt_text("Enter a description: ")?;
    let neighborhood = resolve_neighborhood(conn)?;
    let address = prompt_text("Enter the address: ")?;
    let latitude = prompt_text("Enter latitude (e.g. -34.6037): ")?;
    let longitude = prompt_text("Enter longitude (e.g. -58.3816): ")?;
    let bidding_year = prompt_text("Enter the bidding year: ")?;
    let has_commitment = prompt_yes_no("Does it have a commitment?")?;
    let public_choice = prompt_yes_no("Is it part of the public-choice program?")?;

    let id = record::create(
        conn,
        &NewWork {
            name,
            description: Some(description),
            address: Some(address),
            latitude: Some(latitude),
            longitude: Some(longitude),
            bidding_year: Some(bidding_year),
            has_commitment,
            public_choice,
            environment_id: Some(environment.id),
            work_type_id: Some(work_type.id),
            area_id: Some(area.id),
            district_id: Some(neighborhood.district_id),
            neighborhood_id: Some(neighborhood.id),
        },
    )?;
    println!(
        "\n{} work record {id} created (commitment: {}, public choice: {}).",
        "✔".green().bold(),
        input::canonical_yes_no(has_commitment),
        input::canonical_yes_no(public_choice)
    );

    if minimal {
        return Ok(id);
    }

    transition_project(conn, id)?;
    transition_contracting(conn, id)?;
    transition_award(conn, id)?;
    transition_begin(conn, id)?;
    transition_progress(conn, id)?;
    transition_term(conn, id)?;
    transition_labor(conn, id)?;
    if prompt_yes_no("Mark the work as finished?")? {
        transition_finalize(conn, id)?;
    } else if prompt_yes_no("Rescind the work instead?")? {
        transition_rescind(conn, id)?;
    }
    Ok(id)
}
