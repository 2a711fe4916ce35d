use chrono::NaiveDate;
use obras::core::catalog::{self, CatalogKind};
use obras::core::db;
use obras::core::error::WorksError;
use obras::core::record::{self, NewWork};
use rusqlite::Connection;
use tempfile::TempDir;

fn test_conn() -> (TempDir, Connection) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let conn = db::open(&tmp.path().join("works.db")).expect("open db");
    (tmp, conn)
}

fn minimal_work(conn: &Connection) -> i64 {
    record::create(
        conn,
        &NewWork {
            name: "Plaza Sur".to_string(),
            ..NewWork::default()
        },
    )
    .expect("create work")
}

fn stage_name(conn: &Connection, id: i64) -> Option<String> {
    let work = record::get(conn, id).expect("get").expect("exists");
    let stage_id = work.stage_id?;
    Some(
        conn.query_row(
            "SELECT name FROM stages WHERE id = ?1",
            [stage_id],
            |r| r.get(0),
        )
        .expect("stage row"),
    )
}

#[test]
fn stage_is_unset_until_start_new_project() {
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);

    assert_eq!(stage_name(&conn, id), None);

    record::start_new_project(&conn, id).expect("start project");
    assert_eq!(stage_name(&conn, id).as_deref(), Some(catalog::STAGE_PROJECT));

    // Re-invoking overwrites the same field; it neither fails nor
    // duplicates the stage row.
    record::start_new_project(&conn, id).expect("idempotent");
    assert_eq!(catalog::list(&conn, CatalogKind::Stage).expect("list").len(), 1);
}

#[test]
fn contracting_accepts_raw_amount_text() {
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);
    let kind = catalog::get_or_create(&conn, CatalogKind::ContractingType, "Public bid")
        .expect("contracting type");

    record::start_contracting(&conn, id, kind.id, "500000", "LP-2024-17").expect("contracting");
    let work = record::get(&conn, id).expect("get").expect("exists");
    assert_eq!(work.contract_amount, 500000.0);
    assert_eq!(work.contract_number.as_deref(), Some("LP-2024-17"));
    assert_eq!(work.contracting_type_id, Some(kind.id));

    // This layer never validates the amount; non-numeric text is stored
    // and reads back as 0.
    record::start_contracting(&conn, id, kind.id, "to be defined", "LP-2024-17")
        .expect("raw text accepted");
    let work = record::get(&conn, id).expect("get").expect("exists");
    assert_eq!(work.contract_amount, 0.0);
}

#[test]
fn award_requires_an_existing_contractor() {
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);

    let err = record::award(&conn, id, "Fantasma SRL", "EXP-1").expect_err("must fail");
    assert!(matches!(err, WorksError::NotFound(_)));

    // The failed award must not fabricate a placeholder contractor.
    assert!(catalog::list_contractors(&conn).expect("list").is_empty());
    let work = record::get(&conn, id).expect("get").expect("exists");
    assert_eq!(work.contractor_id, None);
    assert_eq!(work.file_number, None);

    let contractor =
        catalog::create_contractor(&conn, "Norte SA", Some("30-11111111-7")).expect("contractor");
    record::award(&conn, id, "Norte SA", "EXP-1").expect("award");
    let work = record::get(&conn, id).expect("get").expect("exists");
    assert_eq!(work.contractor_id, Some(contractor.id));
    assert_eq!(work.file_number.as_deref(), Some("EXP-1"));
}

#[test]
fn begin_work_fills_the_schedule_group() {
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);
    let financing =
        catalog::get_or_create(&conn, CatalogKind::Financing, "City budget").expect("financing");

    record::begin_work(
        &conn,
        id,
        true,
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("date"),
        financing.id,
        85,
    )
    .expect("begin");

    let work = record::get(&conn, id).expect("get").expect("exists");
    assert!(work.is_featured);
    assert_eq!(work.start_date.as_deref(), Some("2024-03-01"));
    assert_eq!(work.estimated_end.as_deref(), Some("2025-03-01"));
    assert_eq!(work.financing_id, Some(financing.id));
    assert_eq!(work.labor_headcount, 85);
}

#[test]
fn repeatable_transitions_overwrite() {
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);

    record::update_progress(&conn, id, 10.0).expect("progress");
    record::update_progress(&conn, id, 42.5).expect("progress again");
    record::extend_term(&conn, id, 180.0).expect("term");
    record::extend_term(&conn, id, 240.0).expect("term again");
    record::update_labor(&conn, id, 30).expect("labor");
    record::update_labor(&conn, id, 55).expect("labor again");

    let work = record::get(&conn, id).expect("get").expect("exists");
    assert_eq!(work.progress, 42.5);
    assert_eq!(work.term_length, Some(240.0));
    assert_eq!(work.labor_headcount, 55);
}

#[test]
fn terminal_stages_are_alternate_endings_not_deletions() {
    let (_tmp, conn) = test_conn();
    let finished = minimal_work(&conn);
    let rescinded = minimal_work(&conn);

    record::finalize(&conn, finished).expect("finalize");
    record::rescind(&conn, rescinded).expect("rescind");

    assert_eq!(
        stage_name(&conn, finished).as_deref(),
        Some(catalog::STAGE_FINISHED)
    );
    assert_eq!(
        stage_name(&conn, rescinded).as_deref(),
        Some(catalog::STAGE_RESCINDED)
    );
    let works: i64 = conn
        .query_row("SELECT COUNT(*) FROM works", [], |r| r.get(0))
        .expect("count");
    assert_eq!(works, 2);
}

#[test]
fn transitions_are_not_guarded_after_a_terminal_stage() {
    // Nothing stops a transition after finalize or rescind; the last
    // writer wins.
    let (_tmp, conn) = test_conn();
    let id = minimal_work(&conn);

    record::finalize(&conn, id).expect("finalize");
    record::update_progress(&conn, id, 99.0).expect("still allowed");
    record::rescind(&conn, id).expect("also allowed");
    assert_eq!(
        stage_name(&conn, id).as_deref(),
        Some(catalog::STAGE_RESCINDED)
    );
}

#[test]
fn transitions_against_unknown_records_report_not_found() {
    let (_tmp, conn) = test_conn();

    assert!(matches!(
        record::start_new_project(&conn, 999),
        Err(WorksError::NotFound(_))
    ));
    assert!(matches!(
        record::update_progress(&conn, 999, 10.0),
        Err(WorksError::NotFound(_))
    ));
    assert!(matches!(
        record::finalize(&conn, 999),
        Err(WorksError::NotFound(_))
    ));
}
