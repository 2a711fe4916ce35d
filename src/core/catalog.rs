//! Reference catalog: small lookup tables resolved by natural-key text.
//!
//! The seven single-column catalogs share one access path keyed by
//! [`CatalogKind`]. Neighborhoods (which always carry a district) and
//! contractors (which carry an optional tax id) get dedicated functions.
//!
//! `find` returning `None` is the "missing" outcome; whether to create is
//! the caller's decision. The interactive shim asks the operator for
//! consent, batch ingestion always creates. Nothing in this module blocks
//! on input.

use crate::core::error::WorksError;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const STAGE_PROJECT: &str = "Project";
pub const STAGE_CONTRACTING: &str = "Contracting started";
pub const STAGE_AWARDED: &str = "Awarded";
pub const STAGE_IN_PROGRESS: &str = "In progress";
pub const STAGE_FINISHED: &str = "Finished";
pub const STAGE_RESCINDED: &str = "Rescinded";

/// Sentinel used when batch rows leave a description blank.
pub const UNSPECIFIED: &str = "Unspecified";
pub const UNKNOWN_CONTRACTOR: &str = "Unknown Contractor";
pub const UNKNOWN_TAX_ID: &str = "00-00000000-0";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CatalogKind {
    Stage,
    Environment,
    WorkType,
    ResponsibleArea,
    ContractingType,
    Financing,
    District,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Stage => "stages",
            CatalogKind::Environment => "environments",
            CatalogKind::WorkType => "work_types",
            CatalogKind::ResponsibleArea => "responsible_areas",
            CatalogKind::ContractingType => "contracting_types",
            CatalogKind::Financing => "financings",
            CatalogKind::District => "districts",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            CatalogKind::Stage | CatalogKind::District => "name",
            _ => "description",
        }
    }

    /// Human label for prompts and error messages.
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Stage => "stage",
            CatalogKind::Environment => "environment",
            CatalogKind::WorkType => "work type",
            CatalogKind::ResponsibleArea => "responsible area",
            CatalogKind::ContractingType => "contracting type",
            CatalogKind::Financing => "financing",
            CatalogKind::District => "district",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Neighborhood {
    pub id: i64,
    pub name: String,
    pub district_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contractor {
    pub id: i64,
    pub company_name: String,
    pub tax_id: Option<String>,
}

/// Look up a catalog row by exact natural-key equality.
pub fn find(
    conn: &Connection,
    kind: CatalogKind,
    key: &str,
) -> Result<Option<CatalogEntry>, WorksError> {
    let sql = format!(
        "SELECT id, {col} FROM {table} WHERE {col} = ?1",
        col = kind.key_column(),
        table = kind.table()
    );
    conn.query_row(&sql, params![key], |row| {
        Ok(CatalogEntry {
            id: row.get(0)?,
            value: row.get(1)?,
        })
    })
    .optional()
    .map_err(WorksError::RusqliteError)
}

pub fn create(
    conn: &Connection,
    kind: CatalogKind,
    key: &str,
) -> Result<CatalogEntry, WorksError> {
    let sql = format!(
        "INSERT INTO {table}({col}) VALUES(?1)",
        col = kind.key_column(),
        table = kind.table()
    );
    conn.execute(&sql, params![key])?;
    Ok(CatalogEntry {
        id: conn.last_insert_rowid(),
        value: key.to_string(),
    })
}

/// Idempotent on the natural key: a second call with the same text returns
/// the existing row.
pub fn get_or_create(
    conn: &Connection,
    kind: CatalogKind,
    key: &str,
) -> Result<CatalogEntry, WorksError> {
    match find(conn, kind, key)? {
        Some(entry) => Ok(entry),
        None => create(conn, kind, key),
    }
}

pub fn list(conn: &Connection, kind: CatalogKind) -> Result<Vec<CatalogEntry>, WorksError> {
    let sql = format!(
        "SELECT id, {col} FROM {table} ORDER BY id",
        col = kind.key_column(),
        table = kind.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CatalogEntry {
                id: row.get(0)?,
                value: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_neighborhood(
    conn: &Connection,
    name: &str,
) -> Result<Option<Neighborhood>, WorksError> {
    conn.query_row(
        "SELECT id, name, district_id FROM neighborhoods WHERE name = ?1",
        params![name],
        |row| {
            Ok(Neighborhood {
                id: row.get(0)?,
                name: row.get(1)?,
                district_id: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(WorksError::RusqliteError)
}

/// A neighborhood always belongs to a district; the district must exist
/// before the neighborhood row is created.
pub fn create_neighborhood(
    conn: &Connection,
    name: &str,
    district_id: i64,
) -> Result<Neighborhood, WorksError> {
    conn.execute(
        "INSERT INTO neighborhoods(name, district_id) VALUES(?1, ?2)",
        params![name, district_id],
    )?;
    Ok(Neighborhood {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        district_id,
    })
}

pub fn get_or_create_neighborhood(
    conn: &Connection,
    name: &str,
    district_id: i64,
) -> Result<Neighborhood, WorksError> {
    match find_neighborhood(conn, name)? {
        Some(existing) => Ok(existing),
        None => create_neighborhood(conn, name, district_id),
    }
}

pub fn find_contractor(
    conn: &Connection,
    company_name: &str,
) -> Result<Option<Contractor>, WorksError> {
    conn.query_row(
        "SELECT id, company_name, tax_id FROM contractors WHERE company_name = ?1",
        params![company_name],
        |row| {
            Ok(Contractor {
                id: row.get(0)?,
                company_name: row.get(1)?,
                tax_id: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(WorksError::RusqliteError)
}

pub fn create_contractor(
    conn: &Connection,
    company_name: &str,
    tax_id: Option<&str>,
) -> Result<Contractor, WorksError> {
    conn.execute(
        "INSERT INTO contractors(company_name, tax_id) VALUES(?1, ?2)",
        params![company_name, tax_id],
    )?;
    Ok(Contractor {
        id: conn.last_insert_rowid(),
        company_name: company_name.to_string(),
        tax_id: tax_id.map(str::to_string),
    })
}

/// The tax id only applies when the row is created; an existing contractor
/// keeps whatever tax id it already has.
pub fn get_or_create_contractor(
    conn: &Connection,
    company_name: &str,
    tax_id: Option<&str>,
) -> Result<Contractor, WorksError> {
    match find_contractor(conn, company_name)? {
        Some(existing) => Ok(existing),
        None => create_contractor(conn, company_name, tax_id),
    }
}

pub fn list_contractors(conn: &Connection) -> Result<Vec<Contractor>, WorksError> {
    let mut stmt =
        conn.prepare("SELECT id, company_name, tax_id FROM contractors ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Contractor {
                id: row.get(0)?,
                company_name: row.get(1)?,
                tax_id: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
