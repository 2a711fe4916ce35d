//! Bulk loader: turns pre-normalized CSV rows into work records.
//!
//! Each row resolves its catalog references (creating on miss, with
//! sentinel defaults for the columns the source export leaves blank) and
//! inserts one work row. A failing row is logged and skipped; the batch
//! never aborts, and catalog rows created before the failure stay put.

use crate::core::catalog::{self, CatalogKind};
use crate::core::error::WorksError;
use chrono::NaiveDate;
use colored::Colorize;
use rusqlite::{Connection, params};

/// One pre-normalized source row: the useful column subset with blank
/// cells already mapped to `None`.
#[derive(Debug, Default, Clone)]
pub struct WorkRow {
    pub environment: Option<String>,
    pub name: Option<String>,
    pub stage: Option<String>,
    pub work_type: Option<String>,
    pub responsible_area: Option<String>,
    pub description: Option<String>,
    pub contract_amount: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub start_date: Option<String>,
    pub estimated_end: Option<String>,
    pub term_months: Option<String>,
    pub progress: Option<String>,
    pub contractor: Option<String>,
    pub bidding_year: Option<String>,
    pub contracting_type: Option<String>,
    pub contract_number: Option<String>,
    pub tax_id: Option<String>,
    pub labor: Option<String>,
    pub commitment: Option<String>,
    pub featured: Option<String>,
    pub public_choice: Option<String>,
    pub file_number: Option<String>,
    pub financing: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse a locale-formatted currency string: `"$1.234,56"` → `1234.56`.
/// Strips the currency symbol and `.` thousands separators and converts
/// the decimal comma. Unparsable input yields 0.0.
pub fn parse_money(raw: &str) -> f64 {
    let cleaned = raw
        .replace('$', "")
        .replace(' ', "")
        .replace('.', "")
        .replace(',', ".");
    cleaned.parse().unwrap_or(0.0)
}

/// Generic date coercion for source cells; unparsable dates become `None`
/// and the row is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

pub fn parse_int_or_zero(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

pub fn parse_float_or_zero(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Source flags are free text; anything that reads as an affirmative
/// ("si"/"sí", any casing) is true.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("si") | Some("sí")
    )
}

fn resolve_opt(
    conn: &Connection,
    kind: CatalogKind,
    value: Option<&str>,
) -> Result<Option<i64>, WorksError> {
    match value {
        Some(v) => Ok(Some(catalog::get_or_create(conn, kind, v)?.id)),
        None => Ok(None),
    }
}

fn load_row(conn: &Connection, row: &WorkRow) -> Result<(), WorksError> {
    let environment_id = resolve_opt(conn, CatalogKind::Environment, row.environment.as_deref())?;
    let stage_id = resolve_opt(conn, CatalogKind::Stage, row.stage.as_deref())?;
    let area_id = resolve_opt(
        conn,
        CatalogKind::ResponsibleArea,
        row.responsible_area.as_deref(),
    )?;

    // Blank descriptions get a sentinel rather than failing the row.
    let work_type = row.work_type.as_deref().unwrap_or(catalog::UNSPECIFIED);
    let work_type_id = catalog::get_or_create(conn, CatalogKind::WorkType, work_type)?.id;
    let contracting_type = row
        .contracting_type
        .as_deref()
        .unwrap_or(catalog::UNSPECIFIED);
    let contracting_type_id =
        catalog::get_or_create(conn, CatalogKind::ContractingType, contracting_type)?.id;
    let financing = row.financing.as_deref().unwrap_or(catalog::UNSPECIFIED);
    let financing_id = catalog::get_or_create(conn, CatalogKind::Financing, financing)?.id;

    let district_id = resolve_opt(conn, CatalogKind::District, row.district.as_deref())?;
    // A neighborhood always has a district; without one the reference
    // stays NULL.
    let neighborhood_id = match (row.neighborhood.as_deref(), district_id) {
        (Some(name), Some(district)) => {
            Some(catalog::get_or_create_neighborhood(conn, name, district)?.id)
        }
        _ => None,
    };

    let contractor_name = row
        .contractor
        .as_deref()
        .unwrap_or(catalog::UNKNOWN_CONTRACTOR);
    let tax_id = row.tax_id.as_deref().unwrap_or(catalog::UNKNOWN_TAX_ID);
    let contractor_id =
        catalog::get_or_create_contractor(conn, contractor_name, Some(tax_id))?.id;

    let name = row.name.as_deref().ok_or_else(|| {
        WorksError::ValidationError("row has no work name".to_string())
    })?;

    let amount = row.contract_amount.as_deref().map(parse_money).unwrap_or(0.0);
    // The term column is a month count, but the source formats it the same
    // way as currency, so the one parser covers both.
    let term = row.term_months.as_deref().map(parse_money).unwrap_or(0.0);
    let start_date = row
        .start_date
        .as_deref()
        .and_then(parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string());
    let estimated_end = row
        .estimated_end
        .as_deref()
        .and_then(parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string());
    let progress = row.progress.as_deref().map(parse_float_or_zero).unwrap_or(0.0);
    let labor = row.labor.as_deref().map(parse_int_or_zero).unwrap_or(0);

    let ts = crate::core::record::now_iso();
    conn.execute(
        "INSERT INTO works(
            name, description, contract_amount, address, latitude, longitude,
            start_date, estimated_end, term_length, progress, labor_headcount,
            bidding_year, contract_number, has_commitment, is_featured,
            public_choice, file_number, environment_id, stage_id, work_type_id,
            area_id, district_id, neighborhood_id, contracting_type_id,
            financing_id, contractor_id, created_at, updated_at
         ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                  ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
                  ?27, ?28)",
        params![
            name,
            row.description,
            amount,
            row.address,
            row.latitude,
            row.longitude,
            start_date,
            estimated_end,
            term,
            progress,
            labor,
            row.bidding_year,
            row.contract_number,
            parse_flag(row.commitment.as_deref()),
            parse_flag(row.featured.as_deref()),
            parse_flag(row.public_choice.as_deref()),
            row.file_number,
            environment_id,
            stage_id,
            work_type_id,
            area_id,
            district_id,
            neighborhood_id,
            contracting_type_id,
            financing_id,
            contractor_id,
            ts,
            ts,
        ],
    )?;
    Ok(())
}

/// Load every row, logging and skipping failures. Returns how many rows
/// were inserted and how many were skipped; an empty input is an empty
/// outcome, not an error.
pub fn load(conn: &Connection, rows: &[WorkRow]) -> Result<LoadOutcome, WorksError> {
    let mut outcome = LoadOutcome::default();
    for (index, row) in rows.iter().enumerate() {
        match load_row(conn, row) {
            Ok(()) => outcome.inserted += 1,
            Err(err) => {
                eprintln!(
                    "{} row {}: {}",
                    "skipped".yellow().bold(),
                    index + 1,
                    err
                );
                outcome.skipped += 1;
            }
        }
    }
    Ok(outcome)
}
