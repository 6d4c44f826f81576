//! Transaction deletion endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    extract::ApiJson,
    transaction::{TransactionId, TransactionKind, core::delete_transaction},
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body identifying the row to delete.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteForm {
    /// The database ID of the row.
    pub id: Option<i64>,
}

/// The JSON body sent back after a successful delete.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionDeleted {
    /// Always `true`.
    pub success: bool,
}

/// Delete an expense by ID.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteTransactionState>,
    ApiJson(form): ApiJson<DeleteForm>,
) -> Result<Json<TransactionDeleted>, Error> {
    delete(TransactionKind::Expense, form, &state)
}

/// Delete income by ID.
pub async fn delete_income_endpoint(
    State(state): State<DeleteTransactionState>,
    ApiJson(form): ApiJson<DeleteForm>,
) -> Result<Json<TransactionDeleted>, Error> {
    delete(TransactionKind::Income, form, &state)
}

fn delete(
    kind: TransactionKind,
    form: DeleteForm,
    state: &DeleteTransactionState,
) -> Result<Json<TransactionDeleted>, Error> {
    let id: TransactionId = form.id.ok_or(Error::MissingField("id"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(id, kind, &connection).inspect_err(|error| match error {
        Error::DeleteMissingTransaction => {
            tracing::info!("No {} found with ID {id}", kind.table_name())
        }
        error => tracing::error!(
            "An unexpected error occurred while deleting {} {id}: {error}",
            kind.table_name()
        ),
    })?;

    tracing::info!("Deleted {} {id}", kind.table_name());

    Ok(Json(TransactionDeleted { success: true }))
}
