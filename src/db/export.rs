use std::path::Path;

use crate::error::StoreError;
use crate::form::format_date;
use crate::models::Transaction;

/// Write `transactions` to `path` as CSV, newest first. Returns the number of
/// records written. An empty slice still produces the header line.
pub(crate) fn write_csv(path: &Path, transactions: &[Transaction]) -> Result<usize, StoreError> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "date", "label", "amount", "description"])?;
    for txn in &sorted {
        let id = txn.id.map(|id| id.to_string()).unwrap_or_default();
        wtr.write_record([
            id.as_str(),
            format_date(txn.date.date()).as_str(),
            txn.label.as_str(),
            txn.amount.to_string().as_str(),
            txn.description.as_str(),
        ])?;
    }
    wtr.flush()?;

    tracing::info!(path = %path.display(), count = sorted.len(), "exported transactions");
    Ok(sorted.len())
}
