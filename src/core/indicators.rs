//! Read-only aggregate indicators over the accumulated work records.
//!
//! Safe to run repeatedly; nothing here writes.

use crate::core::catalog::{self, CatalogEntry, CatalogKind, Neighborhood};
use crate::core::error::WorksError;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StageCount {
    pub stage: String,
    pub works: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkTypeTotals {
    pub work_type: String,
    pub works: i64,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct Indicators {
    pub responsible_areas: Vec<CatalogEntry>,
    pub work_types: Vec<CatalogEntry>,
    pub works_by_stage: Vec<StageCount>,
    pub totals_by_type: Vec<WorkTypeTotals>,
    pub central_neighborhoods: Vec<Neighborhood>,
    pub finished_within_24: i64,
    pub total_investment: f64,
}

/// Districts considered "central" for the neighborhood listing.
const CENTRAL_DISTRICTS: &str = "(1, 2, 3)";

pub fn gather(conn: &Connection) -> Result<Indicators, WorksError> {
    let responsible_areas = catalog::list(conn, CatalogKind::ResponsibleArea)?;
    let work_types = catalog::list(conn, CatalogKind::WorkType)?;

    let mut stmt = conn.prepare(
        "SELECT s.name, COUNT(w.id)
         FROM works w JOIN stages s ON s.id = w.stage_id
         GROUP BY w.stage_id, s.name
         ORDER BY s.name",
    )?;
    let works_by_stage = stmt
        .query_map([], |row| {
            Ok(StageCount {
                stage: row.get(0)?,
                works: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT t.description, COUNT(w.id), COALESCE(SUM(w.contract_amount), 0)
         FROM works w JOIN work_types t ON t.id = w.work_type_id
         GROUP BY w.work_type_id, t.description
         ORDER BY t.description",
    )?;
    let totals_by_type = stmt
        .query_map([], |row| {
            Ok(WorkTypeTotals {
                work_type: row.get(0)?,
                works: row.get(1)?,
                total_amount: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, district_id FROM neighborhoods
         WHERE district_id IN {CENTRAL_DISTRICTS} ORDER BY id"
    ))?;
    let central_neighborhoods = stmt
        .query_map([], |row| {
            Ok(Neighborhood {
                id: row.get(0)?,
                name: row.get(1)?,
                district_id: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let finished_within_24: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM works w JOIN stages s ON s.id = w.stage_id
         WHERE s.name = ?1 AND w.term_length <= 24",
        params![catalog::STAGE_FINISHED],
        |row| row.get(0),
    )?;

    let total_investment: f64 = conn.query_row(
        "SELECT COALESCE(SUM(contract_amount), 0) FROM works",
        [],
        |row| row.get(0),
    )?;

    Ok(Indicators {
        responsible_areas,
        work_types,
        works_by_stage,
        totals_by_type,
        central_neighborhoods,
        finished_within_24,
        total_investment,
    })
}
