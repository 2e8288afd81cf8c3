use chrono::NaiveDate;

use crate::models::{DisplayRow, Transaction};

/// Build the rows of the transaction list: newest day first, with a
/// `DateHeader` in front of the first transaction of every calendar day.
///
/// The sort is stable, so transactions with identical timestamps keep their
/// input order.
pub(crate) fn prepare_rows(transactions: &[Transaction]) -> Vec<DisplayRow> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut rows = Vec::with_capacity(sorted.len() * 2);
    let mut last_day: Option<NaiveDate> = None;

    for txn in sorted {
        let day = txn.day();
        if last_day != Some(day) {
            rows.push(DisplayRow::DateHeader(day));
            last_day = Some(day);
        }
        rows.push(DisplayRow::TransactionRow(txn.clone()));
    }

    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
}

/// Index of the nearest transaction row from `from` in `direction`, skipping
/// date headers. Stays put when there is nothing further that way.
pub(crate) fn next_transaction_index(
    rows: &[DisplayRow],
    from: usize,
    direction: Direction,
) -> usize {
    let found = match direction {
        Direction::Down => rows
            .iter()
            .enumerate()
            .skip(from + 1)
            .find(|(_, row)| !row.is_header())
            .map(|(i, _)| i),
        Direction::Up => rows
            .iter()
            .enumerate()
            .take(from)
            .rev()
            .find(|(_, row)| !row.is_header())
            .map(|(i, _)| i),
    };
    found.unwrap_or(from)
}

/// First selectable row, or 0 for an empty list.
pub(crate) fn first_transaction_index(rows: &[DisplayRow]) -> usize {
    rows.iter().position(|row| !row.is_header()).unwrap_or(0)
}

/// Last selectable row, or 0 for an empty list.
pub(crate) fn last_transaction_index(rows: &[DisplayRow]) -> usize {
    rows.iter().rposition(|row| !row.is_header()).unwrap_or(0)
}

/// Row index of the transaction with `id`, if it is still in the list.
pub(crate) fn position_of(rows: &[DisplayRow], id: i64) -> Option<usize> {
    rows.iter()
        .position(|row| row.transaction().is_some_and(|t| t.id == Some(id)))
}

/// Closest transaction row to `index` after the list changed underneath the
/// cursor. Prefers the row itself, then the next one down, then up.
pub(crate) fn nearest_transaction_index(rows: &[DisplayRow], index: usize) -> usize {
    if rows.is_empty() {
        return 0;
    }
    let index = index.min(rows.len() - 1);
    if !rows[index].is_header() {
        return index;
    }
    let down = next_transaction_index(rows, index, Direction::Down);
    if down != index {
        return down;
    }
    next_transaction_index(rows, index, Direction::Up)
}
