use chrono::NaiveDate;

use super::Transaction;

/// One line of the rendered transaction list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DisplayRow {
    /// Synthetic marker placed before the first transaction of a day.
    DateHeader(NaiveDate),
    TransactionRow(Transaction),
}

impl DisplayRow {
    pub(crate) fn is_header(&self) -> bool {
        matches!(self, Self::DateHeader(_))
    }

    pub(crate) fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::DateHeader(_) => None,
            Self::TransactionRow(txn) => Some(txn),
        }
    }
}
