//! Centralized database schema definitions for the works registry.
//!
//! One SQLite database holds everything: the reference catalogs (small
//! lookup tables resolved by natural-key text) and the works table that
//! references them. All DDL is `IF NOT EXISTS` so initialization can run
//! on every startup.

pub const WORKS_DB_NAME: &str = "urban_works.db";

pub const SCHEMA_STAGES: &str = "
    CREATE TABLE IF NOT EXISTS stages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_ENVIRONMENTS: &str = "
    CREATE TABLE IF NOT EXISTS environments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_WORK_TYPES: &str = "
    CREATE TABLE IF NOT EXISTS work_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_RESPONSIBLE_AREAS: &str = "
    CREATE TABLE IF NOT EXISTS responsible_areas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_CONTRACTING_TYPES: &str = "
    CREATE TABLE IF NOT EXISTS contracting_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_FINANCINGS: &str = "
    CREATE TABLE IF NOT EXISTS financings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_DISTRICTS: &str = "
    CREATE TABLE IF NOT EXISTS districts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
";

pub const SCHEMA_NEIGHBORHOODS: &str = "
    CREATE TABLE IF NOT EXISTS neighborhoods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        district_id INTEGER NOT NULL,
        FOREIGN KEY(district_id) REFERENCES districts(id)
    )
";

pub const SCHEMA_CONTRACTORS: &str = "
    CREATE TABLE IF NOT EXISTS contractors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_name TEXT NOT NULL UNIQUE,
        tax_id TEXT
    )
";

pub const SCHEMA_WORKS: &str = "
    CREATE TABLE IF NOT EXISTS works (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        contract_amount REAL DEFAULT 0,
        address TEXT,
        latitude TEXT,
        longitude TEXT,
        start_date TEXT,
        estimated_end TEXT,
        term_length REAL,
        progress REAL DEFAULT 0,
        labor_headcount INTEGER DEFAULT 0,
        bidding_year TEXT,
        contract_number TEXT,
        has_commitment INTEGER NOT NULL DEFAULT 0,
        is_featured INTEGER NOT NULL DEFAULT 0,
        public_choice INTEGER NOT NULL DEFAULT 0,
        file_number TEXT,
        environment_id INTEGER,
        stage_id INTEGER,
        work_type_id INTEGER,
        area_id INTEGER,
        district_id INTEGER,
        neighborhood_id INTEGER,
        contracting_type_id INTEGER,
        financing_id INTEGER,
        contractor_id INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(environment_id) REFERENCES environments(id),
        FOREIGN KEY(stage_id) REFERENCES stages(id),
        FOREIGN KEY(work_type_id) REFERENCES work_types(id),
        FOREIGN KEY(area_id) REFERENCES responsible_areas(id),
        FOREIGN KEY(district_id) REFERENCES districts(id),
        FOREIGN KEY(neighborhood_id) REFERENCES neighborhoods(id),
        FOREIGN KEY(contracting_type_id) REFERENCES contracting_types(id),
        FOREIGN KEY(financing_id) REFERENCES financings(id),
        FOREIGN KEY(contractor_id) REFERENCES contractors(id)
    )
";

pub const SCHEMA_INDEX_WORKS_STAGE: &str =
    "CREATE INDEX IF NOT EXISTS idx_works_stage ON works(stage_id)";
pub const SCHEMA_INDEX_WORKS_TYPE: &str =
    "CREATE INDEX IF NOT EXISTS idx_works_type ON works(work_type_id)";
pub const SCHEMA_INDEX_NEIGHBORHOODS_DISTRICT: &str =
    "CREATE INDEX IF NOT EXISTS idx_neighborhoods_district ON neighborhoods(district_id)";

/// Every DDL statement, in dependency order.
pub const ALL_TABLES: &[&str] = &[
    SCHEMA_STAGES,
    SCHEMA_ENVIRONMENTS,
    SCHEMA_WORK_TYPES,
    SCHEMA_RESPONSIBLE_AREAS,
    SCHEMA_CONTRACTING_TYPES,
    SCHEMA_FINANCINGS,
    SCHEMA_DISTRICTS,
    SCHEMA_NEIGHBORHOODS,
    SCHEMA_CONTRACTORS,
    SCHEMA_WORKS,
    SCHEMA_INDEX_WORKS_STAGE,
    SCHEMA_INDEX_WORKS_TYPE,
    SCHEMA_INDEX_NEIGHBORHOODS_DISTRICT,
];
