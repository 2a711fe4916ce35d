use obras::core::catalog::{self, CatalogKind};
use obras::core::db;
use obras::core::indicators;
use obras::core::loader::{self, WorkRow};
use rusqlite::Connection;
use tempfile::TempDir;

fn test_conn() -> (TempDir, Connection) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let conn = db::open(&tmp.path().join("works.db")).expect("open db");
    (tmp, conn)
}

fn row(name: &str) -> WorkRow {
    WorkRow {
        name: Some(name.to_string()),
        ..WorkRow::default()
    }
}

#[test]
fn loads_rows_with_sentinel_defaults_and_coerced_amounts() {
    let (_tmp, conn) = test_conn();

    let mut first = row("Plaza Sur");
    first.stage = Some("Project".to_string());
    first.contract_amount = Some("$1.000,00".to_string());
    // work_type left blank on purpose

    let mut second = row("Av. Central");
    second.stage = Some("Project".to_string());
    second.work_type = Some("Vial".to_string());
    second.contract_amount = Some("invalid".to_string());

    let outcome = loader::load(&conn, &[first, second]).expect("load");
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.skipped, 0);

    let report = indicators::gather(&conn).expect("indicators");
    assert_eq!(report.totals_by_type.len(), 2);
    let unspecified = report
        .totals_by_type
        .iter()
        .find(|t| t.work_type == catalog::UNSPECIFIED)
        .expect("sentinel group");
    assert_eq!(unspecified.works, 1);
    assert_eq!(unspecified.total_amount, 1000.0);
    let vial = report
        .totals_by_type
        .iter()
        .find(|t| t.work_type == "Vial")
        .expect("vial group");
    assert_eq!(vial.works, 1);
    assert_eq!(vial.total_amount, 0.0);
}

#[test]
fn missing_contractor_fields_fall_back_to_sentinels() {
    let (_tmp, conn) = test_conn();

    loader::load(&conn, &[row("Puente Norte")]).expect("load");

    let contractor = catalog::find_contractor(&conn, catalog::UNKNOWN_CONTRACTOR)
        .expect("find")
        .expect("placeholder contractor");
    assert_eq!(contractor.tax_id.as_deref(), Some(catalog::UNKNOWN_TAX_ID));

    // The other sentinel catalogs exist too.
    assert!(
        catalog::find(&conn, CatalogKind::ContractingType, catalog::UNSPECIFIED)
            .expect("find")
            .is_some()
    );
    assert!(
        catalog::find(&conn, CatalogKind::Financing, catalog::UNSPECIFIED)
            .expect("find")
            .is_some()
    );
}

#[test]
fn bad_rows_are_skipped_without_aborting_the_batch() {
    let (_tmp, conn) = test_conn();

    let nameless = WorkRow {
        stage: Some("Project".to_string()),
        ..WorkRow::default()
    };
    let outcome = loader::load(&conn, &[row("Escuela 12"), nameless, row("CESAC 40")])
        .expect("load");
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.skipped, 1);

    // Catalog rows created before the failing row stay; per-row work is
    // not transactional with the insert.
    assert!(
        catalog::find(&conn, CatalogKind::Stage, "Project")
            .expect("find")
            .is_some()
    );
}

#[test]
fn unparsable_scalars_normalize_instead_of_failing() {
    let (_tmp, conn) = test_conn();

    let mut messy = row("Tunel Oeste");
    messy.start_date = Some("someday".to_string());
    messy.estimated_end = Some("2025-06-30".to_string());
    messy.term_months = Some("no term".to_string());
    messy.labor = Some("lots".to_string());
    messy.progress = Some("n/a".to_string());

    let outcome = loader::load(&conn, &[messy]).expect("load");
    assert_eq!(outcome.inserted, 1);

    let (start, end, term, labor, progress): (
        Option<String>,
        Option<String>,
        f64,
        i64,
        f64,
    ) = conn
        .query_row(
            "SELECT start_date, estimated_end, term_length, labor_headcount, progress
             FROM works WHERE name = 'Tunel Oeste'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .expect("row");
    assert_eq!(start, None);
    assert_eq!(end.as_deref(), Some("2025-06-30"));
    assert_eq!(term, 0.0);
    assert_eq!(labor, 0);
    assert_eq!(progress, 0.0);
}

#[test]
fn neighborhood_without_district_stays_unreferenced() {
    let (_tmp, conn) = test_conn();

    let mut orphan = row("Veredas Palermo");
    orphan.neighborhood = Some("Palermo".to_string());
    // no district column

    loader::load(&conn, &[orphan]).expect("load");

    let neighborhood_id: Option<i64> = conn
        .query_row(
            "SELECT neighborhood_id FROM works WHERE name = 'Veredas Palermo'",
            [],
            |r| r.get(0),
        )
        .expect("row");
    assert_eq!(neighborhood_id, None);
    let neighborhoods: i64 = conn
        .query_row("SELECT COUNT(*) FROM neighborhoods", [], |r| r.get(0))
        .expect("count");
    assert_eq!(neighborhoods, 0);
}

#[test]
fn empty_input_is_an_empty_outcome() {
    let (_tmp, conn) = test_conn();
    let outcome = loader::load(&conn, &[]).expect("load");
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn repeated_loads_do_not_duplicate_catalog_rows() {
    let (_tmp, conn) = test_conn();

    let mut first = row("Plaza Sur");
    first.district = Some("1".to_string());
    first.neighborhood = Some("Retiro".to_string());
    first.work_type = Some("Vial".to_string());

    loader::load(&conn, std::slice::from_ref(&first)).expect("first load");
    loader::load(&conn, &[first]).expect("second load");

    assert_eq!(catalog::list(&conn, CatalogKind::District).expect("list").len(), 1);
    assert_eq!(catalog::list(&conn, CatalogKind::WorkType).expect("list").len(), 1);
    let neighborhoods: i64 = conn
        .query_row("SELECT COUNT(*) FROM neighborhoods", [], |r| r.get(0))
        .expect("count");
    assert_eq!(neighborhoods, 1);
    let works: i64 = conn
        .query_row("SELECT COUNT(*) FROM works", [], |r| r.get(0))
        .expect("count");
    assert_eq!(works, 2);
}
