//! Sets up the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, category::create_category_tables, transaction::create_transaction_tables};

/// Create the tables for transactions and categories if they do not exist.
///
/// The tables are created inside a single exclusive SQL transaction, so a
/// failure leaves the database as it was. Calling this on an initialized
/// database is a no-op.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_tables(&transaction)?;
    create_category_tables(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Database schema is ready");

    Ok(())
}
