#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::ledger::Totals;

fn new_txn(label: &str, amount: Decimal, y: i32, m: u32, d: u32) -> NewTransaction {
    NewTransaction {
        label: label.into(),
        amount,
        date: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        description: String::new(),
    }
}

fn setup_test_data(db: &mut Database) -> Vec<Transaction> {
    vec![
        db.create(&new_txn("Salary", dec!(100), 2024, 1, 5)).unwrap(),
        db.create(&new_txn("Lunch", dec!(-20), 2024, 1, 5)).unwrap(),
        db.create(&new_txn("Refund", dec!(50), 2024, 1, 3)).unwrap(),
    ]
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.read_all().unwrap().is_empty());
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_reopen_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.create(&new_txn("Kept", dec!(1), 2024, 1, 1)).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

// ── Create ────────────────────────────────────────────────────

#[test]
fn test_create_assigns_ids() {
    let mut db = Database::open_in_memory().unwrap();
    let created = setup_test_data(&mut db);
    let ids: Vec<i64> = created.iter().map(|t| t.id.unwrap()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
}

#[test]
fn test_create_roundtrips_fields() {
    let mut db = Database::open_in_memory().unwrap();
    let mut input = new_txn("Books", dec!(-12.345), 2024, 2, 29);
    input.description = "second hand, \"good\" condition".into();
    let created = db.create(&input).unwrap();

    let fetched = db.get_transaction(created.id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.amount, dec!(-12.345));
    assert_eq!(fetched.description, "second hand, \"good\" condition");
}

#[test]
fn test_create_keeps_time_of_day() {
    let mut db = Database::open_in_memory().unwrap();
    let mut input = new_txn("Late", dec!(1), 2024, 1, 1);
    input.date = input.date.date().and_hms_opt(23, 59, 58).unwrap();
    let created = db.create(&input).unwrap();
    let fetched = db.get_transaction(created.id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched.date, input.date);
}

// ── Read ──────────────────────────────────────────────────────

#[test]
fn test_read_all_returns_everything() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let all = db.read_all().unwrap();
    assert_eq!(all.len(), 3);
    let totals = Totals::from_transactions(&all);
    assert_eq!(totals.balance, dec!(130));
}

#[test]
fn test_read_all_rejects_corrupt_amount() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    db.conn
        .execute("UPDATE transactions SET amount = 'lots' WHERE label = 'Lunch'", [])
        .unwrap();
    let err = db.read_all().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn test_read_all_rejects_out_of_range_amount() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    db.conn
        .execute(
            "UPDATE transactions SET amount = '79228162514264337593543950335' WHERE label = 'Lunch'",
            [],
        )
        .unwrap();
    let err = db.read_all().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn test_get_transaction_missing() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_transaction(404).unwrap().is_none());
}

// ── Update ────────────────────────────────────────────────────

#[test]
fn test_update_changes_record_in_place() {
    let mut db = Database::open_in_memory().unwrap();
    let mut txns = setup_test_data(&mut db);
    let mut refund = txns.remove(2);
    refund.label = "Refund (shop)".into();
    refund.amount = dec!(-50);
    db.update(&refund).unwrap();

    let fetched = db.get_transaction(refund.id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched.label, "Refund (shop)");
    assert_eq!(fetched.amount, dec!(-50));
    assert_eq!(db.get_transaction_count().unwrap(), 3);
}

#[test]
fn test_update_sign_flip_moves_bucket() {
    let mut db = Database::open_in_memory().unwrap();
    let txns = setup_test_data(&mut db);
    let before = Totals::from_transactions(&db.read_all().unwrap());

    let mut salary = txns[0].clone();
    salary.amount = -salary.amount;
    db.update(&salary).unwrap();

    let after = Totals::from_transactions(&db.read_all().unwrap());
    assert_eq!(before.income, dec!(150));
    assert_eq!(after.income, dec!(50));
    assert_eq!(after.expense, dec!(-120));
    assert_eq!(after.expense_count, 2);
}

#[test]
fn test_update_missing_is_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let mut ghost = setup_test_data(&mut db).remove(0);
    ghost.id = Some(9999);
    let err = db.update(&ghost).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_update_without_id_is_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let mut txn = setup_test_data(&mut db).remove(0);
    txn.id = None;
    assert!(db.update(&txn).unwrap_err().is_not_found());
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_then_read_all_excludes_record() {
    let mut db = Database::open_in_memory().unwrap();
    let txns = setup_test_data(&mut db);
    let id = txns[1].id.unwrap();

    let removed = db.delete(id).unwrap();
    assert_eq!(removed, txns[1]);

    let all = db.read_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|t| t.id != Some(id)));
}

#[test]
fn test_delete_twice_is_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let id = setup_test_data(&mut db)[0].id.unwrap();
    db.delete(id).unwrap();
    let err = db.delete(id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(n) if n == id));
}

#[test]
fn test_deleted_copy_can_be_recreated() {
    let mut db = Database::open_in_memory().unwrap();
    let id = setup_test_data(&mut db)[0].id.unwrap();
    let removed = db.delete(id).unwrap();

    let restored = db.create(&removed.clone().into()).unwrap();
    assert_ne!(restored.id, removed.id);
    assert_eq!(restored.label, removed.label);
    assert_eq!(db.get_transaction_count().unwrap(), 3);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_write_csv_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    let count = write_csv(&path, &db.read_all().unwrap()).unwrap();
    assert_eq!(count, 3);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,date,label,amount,description");
    assert_eq!(lines.len(), 4);
    assert!(lines[3].contains("03/01/2024"));
    assert!(lines[3].contains("Refund"));
}

#[test]
fn test_export_empty_writes_header_only() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(write_csv(&path, &db.read_all().unwrap()).unwrap(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
}
