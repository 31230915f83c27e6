use ledger_core::db::open_db_in_memory;
use ledger_core::{
    AppError, CategoryRepository, DeleteRecordError, DeleteRecordService, NewRecord, Record,
    RecordKind, RecordRepository, SqliteCategoryRepository, SqliteRecordRepository,
    RECORD_NOT_FOUND_MESSAGE, RECORD_NOT_FOUND_STATUS,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

fn seed_record(conn: &Connection, title: &str) -> Record {
    let categories = SqliteCategoryRepository::new(conn);
    let records = SqliteRecordRepository::new(conn);

    let category = categories
        .save(vec![categories.create("Housing")])
        .unwrap()
        .remove(0);
    let record = records.create(NewRecord {
        title,
        kind: RecordKind::Outcome,
        value: Decimal::new(1200, 0),
        category: &category,
    });
    records.save(vec![record]).unwrap().remove(0)
}

#[test]
fn deleting_existing_record_removes_it() {
    let conn = open_db_in_memory().unwrap();
    let record = seed_record(&conn, "Rent");
    let service = DeleteRecordService::new(SqliteRecordRepository::new(&conn));

    service.execute(record.id).unwrap();

    let records = SqliteRecordRepository::new(&conn);
    assert!(records.find_one(record.id).unwrap().is_none());
}

#[test]
fn deleting_missing_record_fails_with_not_found_401() {
    let conn = open_db_in_memory().unwrap();
    let service = DeleteRecordService::new(SqliteRecordRepository::new(&conn));
    let missing = Uuid::new_v4();

    let err = service.execute(missing).unwrap_err();
    assert!(matches!(err, DeleteRecordError::NotFound(id) if id == missing));
    assert_eq!(err.status_code(), RECORD_NOT_FOUND_STATUS);

    let app = AppError::from(err);
    assert_eq!(app.message, RECORD_NOT_FOUND_MESSAGE);
    assert_eq!(app.status_code, 401);
}

#[test]
fn deleting_twice_fails_the_second_time() {
    let conn = open_db_in_memory().unwrap();
    let record = seed_record(&conn, "Rent");
    let service = DeleteRecordService::new(SqliteRecordRepository::new(&conn));

    service.execute(record.id).unwrap();
    let err = service.execute(record.id).unwrap_err();
    assert!(matches!(err, DeleteRecordError::NotFound(_)));
}

#[test]
fn deleting_one_record_leaves_others_and_their_category() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_record(&conn, "Rent");
    let second = seed_record(&conn, "Deposit");
    let service = DeleteRecordService::new(SqliteRecordRepository::new(&conn));

    service.execute(first.id).unwrap();

    let records = SqliteRecordRepository::new(&conn);
    assert_eq!(records.list_records().unwrap(), vec![second.clone()]);

    let categories = SqliteCategoryRepository::new(&conn);
    let housing = categories.find_by_titles(&["Housing".to_string()]).unwrap();
    assert!(housing.iter().any(|c| c.id == first.category_id));
}
