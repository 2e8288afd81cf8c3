#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::app::*;
use crate::db::{Database, TransactionStore};
use crate::error::{StoreError, ValidationError};
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::worker::{Request, Worker};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

fn setup() -> (App, Worker) {
    let worker = Worker::spawn(Database::open_in_memory().unwrap()).unwrap();
    (App::new(), worker)
}

/// Wait for the next reply and hand it to the app.
fn pump(app: &mut App, worker: &Worker) {
    let reply = worker.recv().unwrap();
    app.handle_reply(reply);
}

fn fill(app: &mut App, label: &str, amount: &str, kind: TransactionKind) {
    let state = app.form.as_mut().unwrap();
    state.form.label = label.into();
    state.form.amount = amount.into();
    state.form.kind = kind;
}

fn add(app: &mut App, worker: &mut Worker, label: &str, amount: &str, kind: TransactionKind) {
    app.open_add_form(today());
    fill(app, label, amount, kind);
    app.submit_form(worker);
    pump(app, worker);
}

fn txn(id: i64, day: u32, amount: Decimal) -> Transaction {
    Transaction {
        id: Some(id),
        label: format!("t{id}"),
        amount,
        date: NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        description: String::new(),
    }
}

struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io(std::io::Error::other("read-only filesystem"))
}

impl TransactionStore for BrokenStore {
    fn create(&mut self, _txn: &NewTransaction) -> Result<Transaction, StoreError> {
        Err(broken())
    }

    fn read_all(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(Vec::new())
    }

    fn update(&mut self, _txn: &Transaction) -> Result<(), StoreError> {
        Err(broken())
    }

    fn delete(&mut self, _id: i64) -> Result<Transaction, StoreError> {
        Err(broken())
    }
}

// ── Adding ────────────────────────────────────────────────────

#[test]
fn test_add_creates_record_and_closes_form() {
    let (mut app, mut worker) = setup();
    app.open_add_form(today());
    assert_eq!(app.input_mode, InputMode::Form);
    fill(&mut app, "Salary", "100", TransactionKind::Income);

    app.submit_form(&mut worker);
    assert!(app.form.as_ref().unwrap().saving);
    assert!(app.is_busy());

    pump(&mut app, &worker);
    assert!(app.form.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(!app.is_busy());
    assert_eq!(app.transactions.len(), 1);
    assert_eq!(app.totals.income, dec!(100));
    assert_eq!(app.status_message, "Added 'Salary'");
    // [header, Salary]
    assert_eq!(app.rows.len(), 2);
    assert_eq!(app.row_index, 1);
}

#[test]
fn test_expense_kind_negates_amount() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Lunch", "20", TransactionKind::Expense);
    assert_eq!(app.transactions[0].amount, dec!(-20));
    assert_eq!(app.totals.expense, dec!(-20));
    assert_eq!(app.chart.expense, dec!(20));
}

#[test]
fn test_invalid_form_stays_open_and_sends_nothing() {
    let (mut app, mut worker) = setup();
    app.open_add_form(today());
    fill(&mut app, "  ", "12", TransactionKind::Expense);

    app.submit_form(&mut worker);
    let state = app.form.as_ref().unwrap();
    assert_eq!(state.form.error, Some(ValidationError::LabelRequired));
    assert!(!state.saving);
    assert!(!app.is_busy());
}

#[test]
fn test_store_failure_keeps_form_open() {
    let mut worker = Worker::spawn(BrokenStore).unwrap();
    let mut app = App::new();
    app.open_add_form(today());
    fill(&mut app, "Rent", "500", TransactionKind::Expense);

    app.submit_form(&mut worker);
    pump(&mut app, &worker);

    assert_eq!(app.status_message, SAVE_FAILED);
    let state = app.form.as_ref().unwrap();
    assert!(!state.saving);
    assert_eq!(state.form.label, "Rent");
}

#[test]
fn test_late_reply_does_not_close_a_newer_form() {
    let (mut app, mut worker) = setup();
    app.open_add_form(today());
    fill(&mut app, "First", "1", TransactionKind::Income);
    app.submit_form(&mut worker);

    // The user closes the form and starts another before the reply lands.
    app.close_form();
    app.open_add_form(today());

    pump(&mut app, &worker);
    assert!(app.form.is_some());
    assert_eq!(app.status_message, "Added 'First'");
}

// ── Detail view ───────────────────────────────────────────────

#[test]
fn test_detail_unchanged_submit_writes_nothing() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Salary", "100", TransactionKind::Income);

    app.open_detail();
    assert!(matches!(
        app.form.as_ref().unwrap().mode,
        FormMode::Edit(_)
    ));
    app.submit_form(&mut worker);

    assert!(app.form.is_none());
    assert!(!app.is_busy());
    assert_eq!(app.status_message, "No changes");
}

#[test]
fn test_detail_update_flips_sign() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Gift", "30", TransactionKind::Income);

    app.open_detail();
    app.form.as_mut().unwrap().form.toggle_kind();
    app.submit_form(&mut worker);
    pump(&mut app, &worker);

    assert!(app.form.is_none());
    assert_eq!(app.status_message, "Updated 'Gift'");
    assert_eq!(app.transactions[0].amount, dec!(-30));
    assert_eq!(app.totals.income, Decimal::ZERO);
    assert_eq!(app.totals.expense, dec!(-30));
}

#[test]
fn test_detail_invalid_date_blocks_update() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Rent", "800", TransactionKind::Expense);

    app.open_detail();
    let state = app.form.as_mut().unwrap();
    state.form.label = "Rent (March)".into();
    state.form.date = "2024-01-06".into();
    app.submit_form(&mut worker);

    let state = app.form.as_ref().unwrap();
    assert!(matches!(state.mode, FormMode::Edit(_)));
    assert_eq!(state.form.error, Some(ValidationError::DateInvalid));
    assert!(!state.saving);
    assert!(!app.is_busy());
    assert_eq!(app.input_mode, InputMode::Form);

    // Nothing reached the store.
    app.reload(&mut worker);
    pump(&mut app, &worker);
    assert_eq!(app.transactions.len(), 1);
    assert_eq!(app.transactions[0].label, "Rent");
}

#[test]
fn test_detail_update_of_vanished_record() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Coffee", "4", TransactionKind::Expense);
    let id = app.transactions[0].id.unwrap();

    app.open_detail();
    // Removed behind the app's back.
    worker.submit(Request::Delete(id)).unwrap();
    pump(&mut app, &worker);

    fill(&mut app, "Coffee", "5", TransactionKind::Expense);
    app.submit_form(&mut worker);
    pump(&mut app, &worker);

    assert_eq!(app.status_message, NO_LONGER_EXISTS);
    assert!(app.form.is_none());
}

#[test]
fn test_detail_without_selection() {
    let mut app = App::new();
    app.open_detail();
    assert!(app.form.is_none());
    assert_eq!(app.status_message, "No transaction selected");
}

#[test]
fn test_finish_detail_outcomes() {
    let mut app = App::new();
    app.apply_transactions(vec![txn(1, 5, dec!(10))]);

    app.open_detail();
    app.finish_detail(DetailOutcome::Updated(txn(1, 5, dec!(12))));
    assert!(app.form.is_none());
    assert_eq!(app.status_message, "Updated 't1'");

    app.open_detail();
    app.finish_detail(DetailOutcome::Deleted(txn(1, 5, dec!(10))));
    assert_eq!(app.status_message, "Deleted 't1'. Press u to undo");
    assert_eq!(app.input_mode, InputMode::Normal);
}

// ── Delete and undo ───────────────────────────────────────────

#[test]
fn test_delete_asks_first() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Rent", "500", TransactionKind::Expense);

    app.request_delete();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Rent'?");

    app.cancel_confirm();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert!(!app.is_busy());
    assert_eq!(app.transactions.len(), 1);
}

#[test]
fn test_delete_then_undo_restores_once() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Rent", "500", TransactionKind::Expense);
    let original = app.transactions[0].clone();

    app.request_delete();
    app.confirm(&mut worker);
    pump(&mut app, &worker);
    assert!(app.transactions.is_empty());
    assert_eq!(app.last_deleted.as_ref(), Some(&original));
    assert_eq!(app.status_message, "Deleted 'Rent'. Press u to undo");

    app.undo(&mut worker);
    pump(&mut app, &worker);
    assert_eq!(app.transactions.len(), 1);
    let restored = &app.transactions[0];
    assert_eq!(restored.label, original.label);
    assert_eq!(restored.amount, original.amount);
    assert_eq!(restored.date, original.date);
    assert!(app.last_deleted.is_none());
    assert_eq!(app.status_message, "Restored 'Rent'");

    app.undo(&mut worker);
    assert_eq!(app.status_message, "Nothing to undo");
}

#[test]
fn test_delete_from_detail_closes_it() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Gym", "40", TransactionKind::Expense);

    app.open_detail();
    app.request_delete();
    assert_eq!(app.input_mode, InputMode::Confirm);
    app.confirm(&mut worker);
    assert_eq!(app.input_mode, InputMode::Form);

    pump(&mut app, &worker);
    assert!(app.form.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.transactions.is_empty());
    assert!(app.last_deleted.is_some());
}

#[test]
fn test_delete_twice_reports_missing() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Gym", "40", TransactionKind::Expense);

    app.request_delete();
    let pending = app.pending_action.clone();
    app.confirm(&mut worker);
    pump(&mut app, &worker);

    app.pending_action = pending;
    app.confirm(&mut worker);
    pump(&mut app, &worker);
    assert_eq!(app.status_message, NO_LONGER_EXISTS);
}

// ── Reply ordering ────────────────────────────────────────────

#[test]
fn test_superseded_list_is_not_shown() {
    let (mut app, mut worker) = setup();
    app.reload(&mut worker);
    app.open_add_form(today());
    fill(&mut app, "Salary", "100", TransactionKind::Income);
    app.submit_form(&mut worker);

    // The reload's list predates the pending create.
    pump(&mut app, &worker);
    assert!(!app.loaded);
    assert!(app.transactions.is_empty());

    pump(&mut app, &worker);
    assert!(app.loaded);
    assert_eq!(app.transactions.len(), 1);
}

#[test]
fn test_export_reply_sets_status() {
    let (mut app, mut worker) = setup();
    add(&mut app, &mut worker, "Salary", "100", TransactionKind::Income);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    app.export(&mut worker, path.clone());
    pump(&mut app, &worker);

    assert_eq!(
        app.status_message,
        format!("Exported 1 transactions to {}", path.display())
    );
    assert!(path.exists());
}

// ── Cursor ────────────────────────────────────────────────────

#[test]
fn test_cursor_never_rests_on_a_header() {
    let mut app = App::new();
    app.apply_transactions(vec![
        txn(1, 5, dec!(100)),
        txn(2, 5, dec!(-20)),
        txn(3, 3, dec!(50)),
    ]);
    // [H, 1, 2, H, 3]
    assert_eq!(app.row_index, 1);

    app.move_cursor(crate::ledger::Direction::Down);
    assert_eq!(app.row_index, 2);
    app.move_cursor(crate::ledger::Direction::Down);
    assert_eq!(app.row_index, 4);
    app.move_cursor(crate::ledger::Direction::Down);
    assert_eq!(app.row_index, 4);

    app.move_to_top();
    assert_eq!(app.row_index, 1);
    app.move_to_bottom();
    assert_eq!(app.selected_transaction().unwrap().id, Some(3));
}

#[test]
fn test_selection_follows_record_across_reloads() {
    let mut app = App::new();
    app.apply_transactions(vec![txn(1, 5, dec!(100)), txn(3, 3, dec!(50))]);
    app.move_to_bottom();
    assert_eq!(app.selected_transaction().unwrap().id, Some(3));

    // A newer day pushes everything down.
    app.apply_transactions(vec![
        txn(1, 5, dec!(100)),
        txn(3, 3, dec!(50)),
        txn(4, 9, dec!(-5)),
    ]);
    assert_eq!(app.selected_transaction().unwrap().id, Some(3));

    // The selected record disappears: the cursor lands on a neighbour.
    app.apply_transactions(vec![txn(1, 5, dec!(100)), txn(4, 9, dec!(-5))]);
    assert!(app.selected_transaction().is_some());
}

#[test]
fn test_scroll_keeps_cursor_visible() {
    let mut app = App::new();
    app.visible_rows = 4;
    let many: Vec<Transaction> = (1..=10).map(|d| txn(i64::from(d), d, dec!(1))).collect();
    app.apply_transactions(many);

    app.move_to_bottom();
    assert!(app.row_index >= app.row_scroll);
    assert!(app.row_index < app.row_scroll + app.visible_rows);

    app.move_to_top();
    assert_eq!(app.row_scroll, 0);
}
