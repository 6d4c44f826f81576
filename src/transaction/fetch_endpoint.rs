//! Endpoints for listing transactions within a time window.

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    extract::ApiQuery,
    timeframe::{Timeframe, resolve_start_date},
    timezone::get_local_date,
    transaction::{
        SQLiteTransactionStore, Transaction, TransactionFilter, TransactionKind, TransactionStore,
    },
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct FetchTransactionsState {
    /// Where transactions are read from.
    pub transaction_store: SQLiteTransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for FetchTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct FetchQuery {
    /// How far back to look. Missing or unknown values select the last twelve months.
    #[serde(rename = "timeFrame", default)]
    pub time_frame: Timeframe,
    /// Only list transactions with exactly this category. Empty means all categories.
    pub category: Option<String>,
}

/// List expenses in the requested time window, most recent first.
pub async fn fetch_expenses_endpoint(
    State(state): State<FetchTransactionsState>,
    ApiQuery(query): ApiQuery<FetchQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    fetch(TransactionKind::Expense, query, &state).map(Json)
}

/// List income in the requested time window, most recent first.
pub async fn fetch_income_endpoint(
    State(state): State<FetchTransactionsState>,
    ApiQuery(query): ApiQuery<FetchQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    fetch(TransactionKind::Income, query, &state).map(Json)
}

fn fetch(
    kind: TransactionKind,
    query: FetchQuery,
    state: &FetchTransactionsState,
) -> Result<Vec<Transaction>, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let filter = TransactionFilter {
        since: Some(resolve_start_date(query.time_frame, today)),
        category: query.category.filter(|category| !category.is_empty()),
    };

    tracing::debug!("Fetching {} with {filter:?}", kind.table_name());

    state.transaction_store.get_transactions(kind, &filter)
}
