mod export;
mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::StoreError;
use crate::models::{amount_in_range, NewTransaction, Transaction};

pub(crate) use export::write_csv;

/// Create/read/update/delete over transaction records.
///
/// Each call touches a single record (or reads all of them); there are no
/// multi-record transactions.
pub(crate) trait TransactionStore {
    fn create(&mut self, txn: &NewTransaction) -> Result<Transaction, StoreError>;

    fn read_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no row has the record's id.
    fn update(&mut self, txn: &Transaction) -> Result<(), StoreError>;

    /// Returns the removed record so the caller can offer an undo.
    fn delete(&mut self, id: i64) -> Result<Transaction, StoreError>;
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(path = %path.display(), "opened database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated schema");
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let result = self.conn.query_row(
            "SELECT id, label, amount, date, description FROM transactions WHERE id = ?1",
            params![id],
            read_row,
        );
        match result {
            Ok(raw) => Ok(Some(raw.parse()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }
}

impl TransactionStore for Database {
    fn create(&mut self, txn: &NewTransaction) -> Result<Transaction, StoreError> {
        self.conn.execute(
            "INSERT INTO transactions (label, amount, date, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                txn.label,
                txn.amount.to_string(),
                format_stored_date(&txn.date),
                txn.description,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, label = %txn.label, amount = %txn.amount, "created transaction");
        Ok(txn.clone().into_transaction(id))
    }

    fn read_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, label, amount, date, description FROM transactions ORDER BY date DESC, id",
        )?;
        let rows = stmt.query_map([], read_row)?;
        let raw = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        raw.into_iter().map(RawTransaction::parse).collect()
    }

    fn update(&mut self, txn: &Transaction) -> Result<(), StoreError> {
        let id = txn.id.ok_or(StoreError::NotFound(0))?;
        let changed = self.conn.execute(
            "UPDATE transactions SET label = ?1, amount = ?2, date = ?3, description = ?4
             WHERE id = ?5",
            params![
                txn.label,
                txn.amount.to_string(),
                format_stored_date(&txn.date),
                txn.description,
                id,
            ],
        )?;
        if changed == 0 {
            tracing::warn!(id, "update of missing transaction");
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, amount = %txn.amount, "updated transaction");
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<Transaction, StoreError> {
        let existing = self.get_transaction(id)?.ok_or(StoreError::NotFound(id))?;
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed == 0 {
            tracing::warn!(id, "delete of missing transaction");
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(id, label = %existing.label, "deleted transaction");
        Ok(existing)
    }
}

/// A row as stored, before amount and date are parsed.
struct RawTransaction {
    id: i64,
    label: String,
    amount: String,
    date: String,
    description: String,
}

impl RawTransaction {
    fn parse(self) -> Result<Transaction, StoreError> {
        let amount = Decimal::from_str(&self.amount)
            .ok()
            .filter(|amount| amount_in_range(*amount))
            .ok_or_else(|| {
                StoreError::Corrupt(format!("transaction {}: amount '{}'", self.id, self.amount))
            })?;
        let date = NaiveDateTime::parse_from_str(&self.date, schema::DATE_FORMAT).map_err(|_| {
            StoreError::Corrupt(format!("transaction {}: date '{}'", self.id, self.date))
        })?;
        Ok(Transaction {
            id: Some(self.id),
            label: self.label,
            amount,
            date,
            description: self.description,
        })
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: row.get(0)?,
        label: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
    })
}

fn format_stored_date(date: &NaiveDateTime) -> String {
    date.format(schema::DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests;
