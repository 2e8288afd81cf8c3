//! Text-field model behind the add and edit screens.
//!
//! Fields are kept as the raw strings the user typed; nothing is parsed until
//! [`TransactionForm::validate`] runs.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{FormField, ValidationError};
use crate::models::{amount_in_range, NewTransaction, Transaction, TransactionKind};

/// Display and input format for dates.
pub(crate) const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionForm {
    pub(crate) label: String,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) kind: TransactionKind,
    pub(crate) focus: FormField,
    pub(crate) error: Option<ValidationError>,
}

impl TransactionForm {
    pub(crate) fn new_for_today(today: NaiveDate) -> Self {
        Self {
            label: String::new(),
            amount: String::new(),
            date: format_date(today),
            description: String::new(),
            kind: TransactionKind::Expense,
            focus: FormField::Label,
            error: None,
        }
    }

    /// Pre-fill the form from a stored transaction. The amount is shown
    /// unsigned; the sign becomes the kind.
    pub(crate) fn from_transaction(txn: &Transaction) -> Self {
        Self {
            label: txn.label.clone(),
            amount: txn.abs_amount().normalize().to_string(),
            date: format_date(txn.day()),
            description: txn.description.clone(),
            kind: txn.kind(),
            focus: FormField::Label,
            error: None,
        }
    }

    /// Validate in field order, stopping at the first problem.
    pub(crate) fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(ValidationError::LabelRequired);
        }

        let amount = parse_amount(&self.amount).ok_or(ValidationError::AmountInvalid)?;
        let date = parse_date(&self.date).ok_or(ValidationError::DateInvalid)?;

        Ok(NewTransaction {
            label: label.to_string(),
            amount: self.kind.signed(amount),
            date: start_of_day(date),
            description: self.description.trim().to_string(),
        })
    }

    /// Validate and remember the error so the screen can show it.
    pub(crate) fn submit(&mut self) -> Option<NewTransaction> {
        match self.validate() {
            Ok(txn) => {
                self.error = None;
                Some(txn)
            }
            Err(e) => {
                self.focus = e.field();
                self.error = Some(e);
                None
            }
        }
    }

    pub(crate) fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Label => &self.label,
            FormField::Amount => &self.amount,
            FormField::Date => &self.date,
            FormField::Description => &self.description,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Label => &mut self.label,
            FormField::Amount => &mut self.amount,
            FormField::Date => &mut self.date,
            FormField::Description => &mut self.description,
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        let focus = self.focus;
        self.field_mut(focus).push(c);
        self.clear_error_for(focus);
    }

    pub(crate) fn pop_char(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    /// Typing into a field that has an error clears it once the field is
    /// non-empty again.
    fn clear_error_for(&mut self, field: FormField) {
        if self.error.is_some_and(|e| e.field() == field) && !self.field(field).is_empty() {
            self.error = None;
        }
    }

    pub(crate) fn focus_next(&mut self) {
        let fields = FormField::all();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub(crate) fn focus_prev(&mut self) {
        let fields = FormField::all();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub(crate) fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
    }

    /// Error message for `field`, if the last submit failed on it.
    pub(crate) fn error_for(&self, field: FormField) -> Option<String> {
        self.error
            .filter(|e| e.field() == field)
            .map(|e| e.to_string())
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a decimal amount of at most one trillion in either direction.
///
/// A single comma is read as the decimal separator when no dot is present and
/// one or two digits follow it, e.g. `"12,50"`. `"1,234"` could be a thousands
/// separator, so it is rejected rather than guessed at.
pub(crate) fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = match trimmed.split_once(',') {
        None => trimmed.to_string(),
        Some((whole, fraction))
            if !trimmed.contains('.')
                && (1..=2).contains(&fraction.len())
                && fraction.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{whole}.{fraction}")
        }
        Some(_) => return None,
    };
    Decimal::from_str(&normalized)
        .ok()
        .filter(|amount| amount_in_range(*amount))
}

/// Parse a zero-padded `DD/MM/YYYY` date.
pub(crate) fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Midnight of `date`, the timestamp forms give new transactions.
pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
