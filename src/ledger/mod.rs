//! Pure computations over the transaction list: the day-grouped display rows
//! and the balance/income/expense totals. Nothing here touches storage.

mod prepare;
mod totals;

pub(crate) use prepare::{
    first_transaction_index, last_transaction_index, nearest_transaction_index,
    next_transaction_index, position_of, prepare_rows, Direction,
};
pub(crate) use totals::{ChartData, Totals};
