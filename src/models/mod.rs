mod row;
mod transaction;

pub(crate) use row::DisplayRow;
pub(crate) use transaction::{amount_in_range, NewTransaction, Transaction, TransactionKind};
