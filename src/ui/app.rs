use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::form::TransactionForm;
use crate::ledger::{
    first_transaction_index, last_transaction_index, nearest_transaction_index,
    next_transaction_index, position_of, prepare_rows, ChartData, Direction, Totals,
};
use crate::models::{DisplayRow, NewTransaction, Transaction};
use crate::ui::util::keep_in_view;
use crate::worker::{Done, Reply, Request, Ticket, Worker};

pub(crate) const SAVE_FAILED: &str = "Could not save, try again";
pub(crate) const NO_LONGER_EXISTS: &str = "Transaction no longer exists";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Transactions,
    Chart,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Transactions, Self::Chart]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transactions => write!(f, "Transactions"),
            Self::Chart => write!(f, "Chart"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormMode {
    Add,
    /// Detail view of an existing record, holding it as it was when opened.
    Edit(Transaction),
}

/// The add or detail form currently on screen.
#[derive(Debug, Clone)]
pub(crate) struct FormState {
    pub(crate) mode: FormMode,
    pub(crate) form: TransactionForm,
    /// Identifies this particular opening of the form, so a late reply for a
    /// form the user already closed does not close a newer one.
    pub(crate) generation: u64,
    pub(crate) saving: bool,
}

impl FormState {
    pub(crate) fn editing_id(&self) -> Option<i64> {
        match &self.mode {
            FormMode::Edit(txn) => txn.id,
            FormMode::Add => None,
        }
    }
}

/// How the detail view was left.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DetailOutcome {
    Updated(Transaction),
    /// Carries the removed record for undo.
    Deleted(Transaction),
    Unchanged,
}

/// What a submitted request was for, so its reply can be applied.
#[derive(Debug, Clone)]
enum Origin {
    Load,
    Add { generation: u64 },
    Edit { generation: u64 },
    Delete(i64),
    Undo(Transaction),
    Export,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Derived from `transactions` on every load
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) rows: Vec<DisplayRow>,
    pub(crate) totals: Totals,
    pub(crate) chart: ChartData,
    pub(crate) loaded: bool,

    pub(crate) row_index: usize,
    pub(crate) row_scroll: usize,

    pub(crate) form: Option<FormState>,
    form_generation: u64,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    /// Most recently deleted record, restorable once.
    pub(crate) last_deleted: Option<Transaction>,

    in_flight: HashMap<Ticket, Origin>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Transactions,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            transactions: Vec::new(),
            rows: Vec::new(),
            totals: Totals::default(),
            chart: ChartData::default(),
            loaded: false,

            row_index: 0,
            row_scroll: 0,

            form: None,
            form_generation: 0,

            pending_action: None,
            confirm_message: String::new(),

            last_deleted: None,

            in_flight: HashMap::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// True while any request is waiting on the worker.
    pub(crate) fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    // ── Derived state ────────────────────────────────────────

    /// Replace the transaction list and rebuild everything computed from it.
    /// The cursor follows the selected record when it survives.
    pub(crate) fn apply_transactions(&mut self, transactions: Vec<Transaction>) {
        let selected = self.selected_transaction().and_then(|t| t.id);

        self.rows = prepare_rows(&transactions);
        self.totals = Totals::from_transactions(&transactions);
        self.chart = ChartData::from_totals(&self.totals);
        self.transactions = transactions;
        self.loaded = true;

        self.row_index = selected
            .and_then(|id| position_of(&self.rows, id))
            .unwrap_or_else(|| nearest_transaction_index(&self.rows, self.row_index));
        self.scroll_to_cursor();
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.rows.get(self.row_index).and_then(DisplayRow::transaction)
    }

    // ── Cursor ───────────────────────────────────────────────

    pub(crate) fn move_cursor(&mut self, direction: Direction) {
        self.row_index = next_transaction_index(&self.rows, self.row_index, direction);
        self.scroll_to_cursor();
    }

    pub(crate) fn move_half_page(&mut self, direction: Direction) {
        for _ in 0..(self.visible_rows / 2).max(1) {
            self.row_index = next_transaction_index(&self.rows, self.row_index, direction);
        }
        self.scroll_to_cursor();
    }

    pub(crate) fn move_to_top(&mut self) {
        self.row_index = first_transaction_index(&self.rows);
        self.row_scroll = 0;
    }

    pub(crate) fn move_to_bottom(&mut self) {
        self.row_index = last_transaction_index(&self.rows);
        self.scroll_to_cursor();
    }

    fn select_transaction(&mut self, id: Option<i64>) {
        if let Some(index) = id.and_then(|id| position_of(&self.rows, id)) {
            self.row_index = index;
            self.scroll_to_cursor();
        }
    }

    /// Keep the cursor row, and the date header right above it, on screen.
    fn scroll_to_cursor(&mut self) {
        let page = self.visible_rows.max(1);
        let header_above = self.row_index > 0
            && self
                .rows
                .get(self.row_index - 1)
                .is_some_and(DisplayRow::is_header);
        let top = if header_above {
            self.row_index - 1
        } else {
            self.row_index
        };
        self.row_scroll = keep_in_view(top, self.row_scroll, page);
        self.row_scroll = keep_in_view(self.row_index, self.row_scroll, page);
    }

    // ── Forms ────────────────────────────────────────────────

    pub(crate) fn open_add_form(&mut self, today: NaiveDate) {
        self.open_form(FormMode::Add, TransactionForm::new_for_today(today));
    }

    /// Open the detail view for the transaction under the cursor.
    pub(crate) fn open_detail(&mut self) {
        let Some(txn) = self.selected_transaction().cloned() else {
            self.set_status("No transaction selected");
            return;
        };
        let form = TransactionForm::from_transaction(&txn);
        self.open_form(FormMode::Edit(txn), form);
    }

    fn open_form(&mut self, mode: FormMode, form: TransactionForm) {
        self.form_generation += 1;
        self.form = Some(FormState {
            mode,
            form,
            generation: self.form_generation,
            saving: false,
        });
        self.input_mode = InputMode::Form;
        self.status_message.clear();
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        if matches!(self.input_mode, InputMode::Form | InputMode::Confirm) {
            self.input_mode = InputMode::Normal;
        }
        self.pending_action = None;
    }

    /// Leave the detail view and report what happened to the record.
    pub(crate) fn finish_detail(&mut self, outcome: DetailOutcome) {
        self.close_form();
        match outcome {
            DetailOutcome::Updated(txn) => {
                self.select_transaction(txn.id);
                self.set_status(format!("Updated '{}'", txn.label));
            }
            DetailOutcome::Deleted(txn) => self.set_status(deleted_message(&txn)),
            DetailOutcome::Unchanged => self.set_status("No changes"),
        }
    }

    /// Validate the open form and send it to the worker. Invalid input stays
    /// on screen with the first failing field highlighted.
    pub(crate) fn submit_form(&mut self, worker: &mut Worker) {
        let Some(state) = self.form.as_mut() else {
            return;
        };
        if state.saving {
            return;
        }
        let Some(mut new) = state.form.submit() else {
            return;
        };
        let generation = state.generation;
        let mode = state.mode.clone();

        match mode {
            FormMode::Add => {
                self.set_saving(generation, true);
                self.dispatch(worker, Request::Create(new), Origin::Add { generation });
            }
            FormMode::Edit(original) => {
                let Some(id) = original.id else {
                    self.close_form();
                    self.set_status(NO_LONGER_EXISTS);
                    return;
                };
                // The form only edits the calendar day; keep the stored time of day.
                if new.date.date() == original.date.date() {
                    new.date = original.date;
                }
                if NewTransaction::from(original) == new {
                    self.finish_detail(DetailOutcome::Unchanged);
                    return;
                }
                self.set_saving(generation, true);
                let updated = new.into_transaction(id);
                self.dispatch(worker, Request::Update(updated), Origin::Edit { generation });
            }
        }
    }

    // ── Delete / undo ────────────────────────────────────────

    /// Ask before deleting the record in the detail view, or the one under
    /// the cursor when no form is open.
    pub(crate) fn request_delete(&mut self) {
        let target = match &self.form {
            Some(FormState {
                mode: FormMode::Edit(txn),
                ..
            }) => Some(txn.clone()),
            Some(_) => None,
            None => self.selected_transaction().cloned(),
        };
        let Some((id, label)) = target.and_then(|t| t.id.map(|id| (id, t.label))) else {
            self.set_status("No transaction selected");
            return;
        };
        self.confirm_message = format!("Delete '{label}'?");
        self.pending_action = Some(PendingAction::DeleteTransaction { id, label });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm(&mut self, worker: &mut Worker) {
        self.input_mode = if self.form.is_some() {
            InputMode::Form
        } else {
            InputMode::Normal
        };
        if let Some(PendingAction::DeleteTransaction { id, label }) = self.pending_action.take() {
            tracing::debug!(id, %label, "delete confirmed");
            self.dispatch(worker, Request::Delete(id), Origin::Delete(id));
        }
    }

    pub(crate) fn cancel_confirm(&mut self) {
        self.pending_action = None;
        self.input_mode = if self.form.is_some() {
            InputMode::Form
        } else {
            InputMode::Normal
        };
        self.set_status("Cancelled");
    }

    /// Re-create the last deleted record. Only one undo is kept.
    pub(crate) fn undo(&mut self, worker: &mut Worker) {
        let Some(txn) = self.last_deleted.take() else {
            self.set_status("Nothing to undo");
            return;
        };
        let request = Request::Create(NewTransaction::from(txn.clone()));
        self.dispatch(worker, request, Origin::Undo(txn));
    }

    // ── Storage round-trips ──────────────────────────────────

    pub(crate) fn reload(&mut self, worker: &mut Worker) {
        self.dispatch(worker, Request::ReadAll, Origin::Load);
    }

    pub(crate) fn export(&mut self, worker: &mut Worker, path: PathBuf) {
        self.dispatch(worker, Request::Export(path), Origin::Export);
    }

    fn dispatch(&mut self, worker: &mut Worker, request: Request, origin: Origin) {
        match worker.submit(request) {
            Ok(ticket) => {
                self.in_flight.insert(ticket, origin);
            }
            Err(e) => {
                tracing::error!(error = %e, "could not reach storage worker");
                self.fail(origin, &e);
            }
        }
    }

    /// Apply a finished request. The list in the reply is shown unless a
    /// newer request is still outstanding, whose reply will carry a fresher one.
    pub(crate) fn handle_reply(&mut self, reply: Reply) {
        let Some(origin) = self.in_flight.remove(&reply.ticket) else {
            tracing::debug!(ticket = ?reply.ticket, "reply for unknown ticket");
            return;
        };

        let superseded = self.in_flight.keys().any(|t| *t > reply.ticket);
        if !superseded {
            match reply.transactions {
                Ok(transactions) => self.apply_transactions(transactions),
                Err(e) => self.set_status(format!("Could not load transactions: {e}")),
            }
        }

        match reply.action {
            Ok(done) => self.succeed(origin, done),
            Err(e) => self.fail(origin, &e),
        }
    }

    fn succeed(&mut self, origin: Origin, done: Done) {
        match (origin, done) {
            (Origin::Load, Done::Loaded) => {}
            (Origin::Add { generation }, Done::Created(txn)) => {
                if self.form_is(generation) {
                    self.close_form();
                }
                self.select_transaction(txn.id);
                self.set_status(format!("Added '{}'", txn.label));
            }
            (Origin::Edit { generation }, Done::Updated(txn)) => {
                if self.form_is(generation) {
                    self.finish_detail(DetailOutcome::Updated(txn));
                } else {
                    self.set_status(format!("Updated '{}'", txn.label));
                }
            }
            (Origin::Delete(id), Done::Deleted(txn)) => {
                self.last_deleted = Some(txn.clone());
                if self.detail_shows(id) {
                    self.finish_detail(DetailOutcome::Deleted(txn));
                } else {
                    self.set_status(deleted_message(&txn));
                }
            }
            (Origin::Undo(_), Done::Created(txn)) => {
                self.select_transaction(txn.id);
                self.set_status(format!("Restored '{}'", txn.label));
            }
            (Origin::Export, Done::Exported { path, count }) => {
                if count == 0 {
                    self.set_status("No transactions to export");
                } else {
                    self.set_status(format!("Exported {count} transactions to {}", path.display()));
                }
            }
            (origin, done) => {
                tracing::warn!(?origin, ?done, "reply does not match its request");
            }
        }
    }

    fn fail(&mut self, origin: Origin, error: &StoreError) {
        match origin {
            Origin::Load => self.set_status(format!("Could not load transactions: {error}")),
            Origin::Add { generation } => {
                self.set_saving(generation, false);
                self.set_status(SAVE_FAILED);
            }
            Origin::Edit { generation } => {
                if error.is_not_found() {
                    if self.form_is(generation) {
                        self.close_form();
                    }
                    self.set_status(NO_LONGER_EXISTS);
                } else {
                    self.set_saving(generation, false);
                    self.set_status(SAVE_FAILED);
                }
            }
            Origin::Delete(id) => {
                if error.is_not_found() {
                    if self.detail_shows(id) {
                        self.close_form();
                    }
                    self.set_status(NO_LONGER_EXISTS);
                } else {
                    self.set_status("Could not delete, try again");
                }
            }
            Origin::Undo(txn) => {
                self.last_deleted = Some(txn);
                self.set_status("Could not restore, try again");
            }
            Origin::Export => self.set_status(format!("Export failed: {error}")),
        }
    }

    fn detail_shows(&self, id: i64) -> bool {
        self.form
            .as_ref()
            .and_then(FormState::editing_id)
            .is_some_and(|editing| editing == id)
    }

    fn form_is(&self, generation: u64) -> bool {
        self.form.as_ref().is_some_and(|f| f.generation == generation)
    }

    fn set_saving(&mut self, generation: u64, saving: bool) {
        if let Some(state) = self.form.as_mut().filter(|f| f.generation == generation) {
            state.saving = saving;
        }
    }
}

fn deleted_message(txn: &Transaction) -> String {
    format!("Deleted '{}'. Press u to undo", txn.label)
}
