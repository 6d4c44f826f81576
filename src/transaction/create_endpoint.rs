//! Endpoints for recording expenses and income.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    AppState, Error,
    extract::ApiJson,
    transaction::{NewTransaction, Transaction, TransactionKind, core::create_transaction},
};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for recording a transaction.
///
/// Every field is optional so that a missing field is reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The category name, e.g. "Food".
    pub category: Option<String>,
    /// The amount spent or earned.
    pub amount: Option<f64>,
    /// The date of the transaction, formatted as "YYYY-MM-DD".
    ///
    /// An RFC 3339 date-time such as "2025-01-02T00:00:00.000Z" is also
    /// accepted, and its calendar date is used.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<Date>,
    /// Optional notes.
    pub notes: Option<String>,
    /// "income" for income, anything else for an expense.
    ///
    /// Only read by [create_transaction_endpoint].
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionForm {
    /// Check the required fields are present and build a transaction of `kind`.
    ///
    /// # Errors
    /// Returns [Error::MissingField] if the category is missing or blank, the
    /// amount is missing or zero, or the date is missing.
    fn into_new_transaction(self, kind: TransactionKind) -> Result<NewTransaction, Error> {
        let category = self
            .category
            .filter(|category| !category.trim().is_empty())
            .ok_or(Error::MissingField("category"))?;
        let amount = self
            .amount
            .filter(|amount| *amount != 0.0)
            .ok_or(Error::MissingField("amount"))?;
        let date = self.date.ok_or(Error::MissingField("date"))?;
        let notes = self.notes.filter(|notes| !notes.trim().is_empty());

        Ok(Transaction::build(kind, amount, date, category.trim()).notes(notes))
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    parse_date(&text).map(Some).map_err(|_| {
        serde::de::Error::custom(format!(
            "invalid date \"{text}\", expected YYYY-MM-DD or an RFC 3339 date-time"
        ))
    })
}

fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, DATE_FORMAT)
        .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(OffsetDateTime::date))
}

/// The JSON body sent back after a transaction is recorded.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionCreated {
    /// A human readable confirmation.
    pub message: String,
    /// The stored transaction.
    pub transaction: Transaction,
}

/// Record an expense.
pub async fn create_expense_endpoint(
    State(state): State<CreateTransactionState>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Json<TransactionCreated>, Error> {
    create(TransactionKind::Expense, form, &state)
}

/// Record income.
pub async fn create_income_endpoint(
    State(state): State<CreateTransactionState>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Json<TransactionCreated>, Error> {
    create(TransactionKind::Income, form, &state)
}

/// Record an expense or income depending on the `type` field.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Json<TransactionCreated>, Error> {
    let kind = match form.kind.as_deref() {
        Some("income") => TransactionKind::Income,
        _ => TransactionKind::Expense,
    };

    create(kind, form, &state)
}

fn create(
    kind: TransactionKind,
    form: TransactionForm,
    state: &CreateTransactionState,
) -> Result<Json<TransactionCreated>, Error> {
    let new_transaction = form.into_new_transaction(kind)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(new_transaction, &connection)?;
    tracing::info!(
        "Recorded {} {} in \"{}\"",
        kind.table_name(),
        transaction.id,
        transaction.category
    );

    let message = match kind {
        TransactionKind::Expense => "Expense added successfully",
        TransactionKind::Income => "Income added successfully",
    };

    Ok(Json(TransactionCreated {
        message: message.to_owned(),
        transaction,
    }))
}
