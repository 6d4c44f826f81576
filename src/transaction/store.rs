//! The read-side repository that reporting code fetches transactions through.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    transaction::{Transaction, TransactionFilter, TransactionKind, core::get_transactions},
};

/// Retrieves batches of transactions for reports.
pub trait TransactionStore {
    /// Retrieve the transactions of `kind` selected by `filter`, most recent first.
    fn get_transactions(
        &self,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error>;
}

/// Retrieves transactions from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// # Errors
    /// This function will return a [Error::DatabaseLockError] if the lock is
    /// poisoned, or an [Error::SqlError] if there is an SQL error.
    fn get_transactions(
        &self,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions(kind, filter, &connection)
    }
}
