//! Expenses and income: storage, the read-side store used by reports, and the
//! JSON endpoints for recording, listing and deleting them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod fetch_endpoint;
mod store;

pub use self::core::{
    NewTransaction, Transaction, TransactionFilter, TransactionId, TransactionKind,
    create_transaction_tables, sum_transactions,
};
#[cfg(test)]
pub use self::core::{create_transaction, get_transaction};
pub use create_endpoint::{
    create_expense_endpoint, create_income_endpoint, create_transaction_endpoint,
};
pub use delete_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use fetch_endpoint::{fetch_expenses_endpoint, fetch_income_endpoint};
pub use store::{SQLiteTransactionStore, TransactionStore};
