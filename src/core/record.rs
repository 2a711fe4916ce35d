//! The work record and its lifecycle transitions.
//!
//! A record is created with a minimal attribute subset and then advanced
//! through named transitions, each of which fills in one attribute group
//! and persists immediately. Transitions are idempotent at the storage
//! level (re-invoking overwrites the same fields) and are deliberately not
//! guarded against out-of-order or post-terminal invocation: any
//! transition may run at any time, and the last writer wins.

use crate::core::catalog::{self, CatalogKind};
use crate::core::error::WorksError;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

/// Minimal attribute subset for creating a work record. Every reference is
/// optional so incomplete source rows still produce a record.
#[derive(Debug, Default, Clone)]
pub struct NewWork {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub bidding_year: Option<String>,
    pub has_commitment: bool,
    pub public_choice: bool,
    pub environment_id: Option<i64>,
    pub work_type_id: Option<i64>,
    pub area_id: Option<i64>,
    pub district_id: Option<i64>,
    pub neighborhood_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub contract_amount: f64,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub start_date: Option<String>,
    pub estimated_end: Option<String>,
    pub term_length: Option<f64>,
    pub progress: f64,
    pub labor_headcount: i64,
    pub bidding_year: Option<String>,
    pub contract_number: Option<String>,
    pub has_commitment: bool,
    pub is_featured: bool,
    pub public_choice: bool,
    pub file_number: Option<String>,
    pub environment_id: Option<i64>,
    pub stage_id: Option<i64>,
    pub work_type_id: Option<i64>,
    pub area_id: Option<i64>,
    pub district_id: Option<i64>,
    pub neighborhood_id: Option<i64>,
    pub contracting_type_id: Option<i64>,
    pub financing_id: Option<i64>,
    pub contractor_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

pub(crate) fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Persist a new record with its minimal attributes. The stage stays unset
/// until `start_new_project` runs.
pub fn create(conn: &Connection, work: &NewWork) -> Result<i64, WorksError> {
    let ts = now_iso();
    conn.execute(
        "INSERT INTO works(
            name, description, address, latitude, longitude, bidding_year,
            has_commitment, public_choice, environment_id, work_type_id,
            area_id, district_id, neighborhood_id, created_at, updated_at
         ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            work.name,
            work.description,
            work.address,
            work.latitude,
            work.longitude,
            work.bidding_year,
            work.has_commitment,
            work.public_choice,
            work.environment_id,
            work.work_type_id,
            work.area_id,
            work.district_id,
            work.neighborhood_id,
            ts,
            ts,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<WorkRecord>, WorksError> {
    conn.query_row(
        // Interactive contracting accepts the amount as raw text, so the
        // column can hold non-numeric values; CAST folds those to 0.0.
        "SELECT id, name, description, CAST(contract_amount AS REAL), address,
                latitude, longitude, start_date, estimated_end, term_length,
                progress, labor_headcount, bidding_year, contract_number,
                has_commitment, is_featured, public_choice, file_number,
                environment_id, stage_id, work_type_id, area_id, district_id,
                neighborhood_id, contracting_type_id, financing_id,
                contractor_id, created_at, updated_at
         FROM works WHERE id = ?1",
        params![id],
        |row| {
            Ok(WorkRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                contract_amount: row.get(3)?,
                address: row.get(4)?,
                latitude: row.get(5)?,
                longitude: row.get(6)?,
                start_date: row.get(7)?,
                estimated_end: row.get(8)?,
                term_length: row.get(9)?,
                progress: row.get(10)?,
                labor_headcount: row.get(11)?,
                bidding_year: row.get(12)?,
                contract_number: row.get(13)?,
                has_commitment: row.get(14)?,
                is_featured: row.get(15)?,
                public_choice: row.get(16)?,
                file_number: row.get(17)?,
                environment_id: row.get(18)?,
                stage_id: row.get(19)?,
                work_type_id: row.get(20)?,
                area_id: row.get(21)?,
                district_id: row.get(22)?,
                neighborhood_id: row.get(23)?,
                contracting_type_id: row.get(24)?,
                financing_id: row.get(25)?,
                contractor_id: row.get(26)?,
                created_at: row.get(27)?,
                updated_at: row.get(28)?,
            })
        },
    )
    .optional()
    .map_err(WorksError::RusqliteError)
}

fn require_updated(rows: usize, id: i64) -> Result<(), WorksError> {
    if rows == 0 {
        Err(WorksError::NotFound(format!("work record {id}")))
    } else {
        Ok(())
    }
}

fn set_stage(conn: &Connection, id: i64, stage_name: &str) -> Result<(), WorksError> {
    let stage = catalog::get_or_create(conn, CatalogKind::Stage, stage_name)?;
    let rows = conn.execute(
        "UPDATE works SET stage_id = ?1, updated_at = ?2 WHERE id = ?3",
        params![stage.id, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Transition 1: assign the "Project" stage.
pub fn start_new_project(conn: &Connection, id: i64) -> Result<(), WorksError> {
    set_stage(conn, id, catalog::STAGE_PROJECT)
}

/// Transition 2: record contracting type, amount, and contract number.
///
/// The amount arrives as raw operator text and is bound as-is; numeric
/// strings are folded to REAL by column affinity, anything else is stored
/// verbatim. Ingestion coerces the same field numerically; the two paths
/// intentionally differ.
pub fn start_contracting(
    conn: &Connection,
    id: i64,
    contracting_type_id: i64,
    amount_text: &str,
    contract_number: &str,
) -> Result<(), WorksError> {
    let rows = conn.execute(
        "UPDATE works SET contracting_type_id = ?1, contract_amount = ?2,
                          contract_number = ?3, updated_at = ?4
         WHERE id = ?5",
        params![contracting_type_id, amount_text, contract_number, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Transition 3: award the work to an existing contractor.
///
/// Unlike batch ingestion this never creates a placeholder; an unknown
/// company name is a `NotFound` the caller must retry.
pub fn award(
    conn: &Connection,
    id: i64,
    contractor_name: &str,
    file_number: &str,
) -> Result<(), WorksError> {
    let Some(contractor) = catalog::find_contractor(conn, contractor_name)? else {
        return Err(WorksError::NotFound(format!(
            "contractor '{contractor_name}'"
        )));
    };
    let rows = conn.execute(
        "UPDATE works SET contractor_id = ?1, file_number = ?2, updated_at = ?3
         WHERE id = ?4",
        params![contractor.id, file_number, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Transition 4: dates, financing, featured flag, and labor headcount.
pub fn begin_work(
    conn: &Connection,
    id: i64,
    is_featured: bool,
    start_date: NaiveDate,
    estimated_end: NaiveDate,
    financing_id: i64,
    labor_headcount: i64,
) -> Result<(), WorksError> {
    let rows = conn.execute(
        "UPDATE works SET is_featured = ?1, start_date = ?2, estimated_end = ?3,
                          financing_id = ?4, labor_headcount = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            is_featured,
            start_date.format("%Y-%m-%d").to_string(),
            estimated_end.format("%Y-%m-%d").to_string(),
            financing_id,
            labor_headcount,
            now_iso(),
            id,
        ],
    )?;
    require_updated(rows, id)
}

/// Repeatable: set the progress percentage.
pub fn update_progress(conn: &Connection, id: i64, progress: f64) -> Result<(), WorksError> {
    let rows = conn.execute(
        "UPDATE works SET progress = ?1, updated_at = ?2 WHERE id = ?3",
        params![progress, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Repeatable: overwrite the term length with a new value.
pub fn extend_term(conn: &Connection, id: i64, term_length: f64) -> Result<(), WorksError> {
    let rows = conn.execute(
        "UPDATE works SET term_length = ?1, updated_at = ?2 WHERE id = ?3",
        params![term_length, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Repeatable: overwrite the labor headcount.
pub fn update_labor(conn: &Connection, id: i64, labor_headcount: i64) -> Result<(), WorksError> {
    let rows = conn.execute(
        "UPDATE works SET labor_headcount = ?1, updated_at = ?2 WHERE id = ?3",
        params![labor_headcount, now_iso(), id],
    )?;
    require_updated(rows, id)
}

/// Terminal transition: Stage := "Finished". The record is kept, never
/// deleted.
pub fn finalize(conn: &Connection, id: i64) -> Result<(), WorksError> {
    set_stage(conn, id, catalog::STAGE_FINISHED)
}

/// Terminal transition: Stage := "Rescinded".
pub fn rescind(conn: &Connection, id: i64) -> Result<(), WorksError> {
    set_stage(conn, id, catalog::STAGE_RESCINDED)
}
