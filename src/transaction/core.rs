//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money was spent or earned.
///
/// Each kind is stored in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money that was spent.
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionKind {
    /// The name of the table that stores transactions of this kind.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Expense => "expenses",
            Self::Income => "income",
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// The free-text category the transaction was recorded under, e.g. "Food".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free-text notes, e.g. "Weekly shopping".
    pub notes: Option<String>,
    /// Whether this is an expense or income.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, date: Date, category: &str) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            date,
            category: category.to_owned(),
            notes: None,
        }
    }
}

/// A transaction that has not been inserted into the database yet.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// Which table the transaction goes into.
    pub kind: TransactionKind,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category name. Not checked against the category tables.
    pub category: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// Selects which transactions to retrieve.
///
/// Results are always ordered by date, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions on or after this date.
    pub since: Option<Date>,
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is less than zero,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_transaction.amount < 0.0 {
        return Err(Error::NegativeAmount(new_transaction.amount));
    }

    let kind = new_transaction.kind;
    let query = format!(
        "INSERT INTO {} (amount, category, date, notes)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, amount, category, date, notes",
        kind.table_name()
    );

    let transaction = connection.prepare(&query)?.query_row(
        (
            new_transaction.amount,
            new_transaction.category,
            new_transaction.date,
            new_transaction.notes,
        ),
        |row| map_transaction_row(row, kind),
    )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(
    id: TransactionId,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let query = format!(
        "SELECT id, amount, category, date, notes FROM {} WHERE id = :id",
        kind.table_name()
    );

    let transaction = connection
        .prepare(&query)?
        .query_row(&[(":id", &id)], |row| map_transaction_row(row, kind))?;

    Ok(transaction)
}

/// Retrieve the transactions of `kind` selected by `filter`, most recent first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    kind: TransactionKind,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query = format!(
        "SELECT id, amount, category, date, notes FROM {}",
        kind.table_name()
    );
    let mut conditions = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(since) = filter.since {
        params.push(Value::Text(since.to_string()));
        conditions.push(format!("date >= ?{}", params.len()));
    }

    if let Some(category) = &filter.category {
        params.push(Value::Text(category.clone()));
        conditions.push(format!("category = ?{}", params.len()));
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    query.push_str(" ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            map_transaction_row(row, kind)
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete the transaction of `kind` with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if no transaction has the ID `id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<(), Error> {
    let query = format!("DELETE FROM {} WHERE id = ?1", kind.table_name());
    let rows_affected = connection.execute(&query, [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions of `kind` in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(kind: TransactionKind, connection: &Connection) -> Result<u32, Error> {
    let query = format!("SELECT COUNT(id) FROM {};", kind.table_name());

    connection
        .query_row(&query, [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Get the sum of all transaction amounts of `kind`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn sum_transactions(kind: TransactionKind, connection: &Connection) -> Result<f64, Error> {
    let query = format!("SELECT COALESCE(SUM(amount), 0.0) FROM {};", kind.table_name());

    connection
        .query_row(&query, [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense and income tables in the database.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        let table = kind.table_name();

        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_date_category ON {table}(date, category);"
        ))?;
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(
    row: &Row,
    kind: TransactionKind,
) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category = row.get(2)?;
    let date = row.get(3)?;
    let notes = row.get(4)?;

    Ok(Transaction {
        id,
        amount,
        category,
        date,
        notes,
        kind,
    })
}

// ============================================================================
// TESTS
// ============================================================================
