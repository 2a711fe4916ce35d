use crate::core::error::WorksError;
use crate::core::schemas;
use rusqlite::Connection;
use std::path::Path;

/// Open the registry database with the standard pragmas applied.
pub fn db_connect(db_path: &Path) -> Result<Connection, WorksError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(WorksError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(WorksError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(WorksError::RusqliteError)?;
    Ok(conn)
}

/// Create every catalog and works table if missing.
pub fn ensure_schema(conn: &Connection) -> Result<(), WorksError> {
    for ddl in schemas::ALL_TABLES {
        conn.execute(ddl, [])?;
    }
    Ok(())
}

/// Open the database and make sure the schema exists. The single
/// connection is opened once at process start and threaded through every
/// component call; there is no global handle.
pub fn open(db_path: &Path) -> Result<Connection, WorksError> {
    let conn = db_connect(db_path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}
