use rust_decimal::Decimal;

use crate::models::Transaction;

/// Running totals over a set of transactions.
///
/// `expense` keeps its sign (it is zero or negative) so that
/// `balance == income + expense` always holds. Use [`Totals::expense_abs`]
/// for display. Amounts are capped at one trillion on entry and on load, so
/// these sums stay far inside `Decimal`'s range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) balance: Decimal,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) income_count: usize,
    pub(crate) expense_count: usize,
}

impl Totals {
    pub(crate) fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut acc, txn| {
            acc.balance += txn.amount;
            if txn.is_income() {
                acc.income += txn.amount;
                acc.income_count += 1;
            } else if txn.is_expense() {
                acc.expense += txn.amount;
                acc.expense_count += 1;
            }
            acc
        })
    }

    pub(crate) fn expense_abs(&self) -> Decimal {
        self.expense.abs()
    }
}

/// The two-bar income vs. expenses dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ChartData {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
}

impl ChartData {
    pub(crate) const INCOME_LABEL: &'static str = "Income";
    pub(crate) const EXPENSE_LABEL: &'static str = "Expenses";

    pub(crate) fn from_totals(totals: &Totals) -> Self {
        Self {
            income: totals.income,
            expense: totals.expense_abs(),
        }
    }

    pub(crate) fn buckets(&self) -> [(&'static str, Decimal); 2] {
        [
            (Self::INCOME_LABEL, self.income),
            (Self::EXPENSE_LABEL, self.expense),
        ]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }
}
