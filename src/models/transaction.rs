use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Largest magnitude a single amount may have. Summing the whole table can
/// then never overflow `Decimal`.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000;

pub(crate) fn amount_in_range(amount: Decimal) -> bool {
    amount.abs() <= Decimal::from(AMOUNT_LIMIT)
}

/// Income or expense, as chosen on the input form.
///
/// Persisted records carry no kind column: the sign of the amount decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }

    /// Apply the sign convention: expenses are stored negated. Zero is
    /// always stored as plain `0`, never `-0`.
    pub(crate) fn signed(self, amount: Decimal) -> Decimal {
        if amount.is_zero() {
            return Decimal::ZERO;
        }
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: Option<i64>,
    pub(crate) label: String,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDateTime,
    pub(crate) description: String,
}

impl Transaction {
    pub(crate) fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub(crate) fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// The calendar day this transaction is grouped under.
    pub(crate) fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Zero counts as income, matching how the list colours amounts.
    pub(crate) fn kind(&self) -> TransactionKind {
        if self.is_expense() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewTransaction {
    pub(crate) label: String,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDateTime,
    pub(crate) description: String,
}

impl NewTransaction {
    pub(crate) fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id: Some(id),
            label: self.label,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

impl From<Transaction> for NewTransaction {
    fn from(txn: Transaction) -> Self {
        Self {
            label: txn.label,
            amount: txn.amount,
            date: txn.date,
            description: txn.description,
        }
    }
}
