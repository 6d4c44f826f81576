//! JSON endpoints for the spending reports and the balance card.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    extract::ApiQuery,
    report::{
        CategorySummary, Granularity, PeriodTotal, aggregate_by_period, summarize_by_category,
    },
    timeframe::{Timeframe, resolve_start_date},
    timezone::get_local_date,
    transaction::{
        SQLiteTransactionStore, Transaction, TransactionFilter, TransactionKind, TransactionStore,
        sum_transactions,
    },
};

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// Where expenses are read from.
    pub transaction_store: SQLiteTransactionStore,
    /// The database connection, used for the balance totals.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Rank the expense categories within `timeframe`.
///
/// A failure to read expenses is logged and reported as no spending.
pub fn category_report(
    store: &impl TransactionStore,
    timeframe: Timeframe,
    today: Date,
) -> Vec<CategorySummary> {
    let filter = TransactionFilter {
        since: Some(resolve_start_date(timeframe, today)),
        category: None,
    };

    summarize_by_category(&get_expenses_or_empty(store, &filter))
}

/// Total the expenses in each period of the chart window for `granularity`.
///
/// A failure to read expenses is logged and reported as zero spending in every period.
pub fn spending_report(
    store: &impl TransactionStore,
    granularity: Granularity,
    today: Date,
) -> Vec<PeriodTotal> {
    let filter = TransactionFilter {
        since: Some(granularity.window_start(today)),
        category: None,
    };

    aggregate_by_period(&get_expenses_or_empty(store, &filter), granularity, today)
}

fn get_expenses_or_empty(
    store: &impl TransactionStore,
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    store
        .get_transactions(TransactionKind::Expense, filter)
        .unwrap_or_else(|error| {
            tracing::warn!("Could not get expenses for report, showing no data: {error}");
            Vec::new()
        })
}

/// Total income, total expenses and the difference between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
    /// `income` minus `expenses`.
    pub balance: f64,
}

/// Compute the all-time balance.
///
/// # Errors
/// Returns an [Error::SqlError] if the totals could not be read.
pub fn get_balance(connection: &Connection) -> Result<Balance, Error> {
    let income = sum_transactions(TransactionKind::Income, connection)?;
    let expenses = sum_transactions(TransactionKind::Expense, connection)?;

    Ok(Balance {
        income,
        expenses,
        balance: income - expenses,
    })
}

/// The query string for the category report.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryReportQuery {
    /// The reporting window.
    #[serde(rename = "timeFrame", default)]
    pub time_frame: Timeframe,
    /// A client chosen request number, echoed back in the response.
    pub seq: Option<u64>,
}

/// The category report response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryReport {
    /// The `seq` from the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// The top categories, largest first.
    pub categories: Vec<CategorySummary>,
}

/// Get the top expense categories for a timeframe.
pub async fn category_report_endpoint(
    State(state): State<ReportState>,
    ApiQuery(query): ApiQuery<CategoryReportQuery>,
) -> Result<Json<CategoryReport>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    Ok(Json(CategoryReport {
        seq: query.seq,
        categories: category_report(&state.transaction_store, query.time_frame, today),
    }))
}

/// The query string for the spending report.
#[derive(Debug, Default, Deserialize)]
pub struct SpendingReportQuery {
    /// The size of each period.
    #[serde(default)]
    pub granularity: Granularity,
    /// A client chosen request number, echoed back in the response.
    pub seq: Option<u64>,
}

/// The spending report response body.
#[derive(Debug, Serialize)]
pub struct SpendingReport {
    /// The `seq` from the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// The size of each period.
    pub granularity: Granularity,
    /// One entry per period, oldest first.
    pub periods: Vec<PeriodTotal>,
}

/// Get the spending per period for the trend chart.
pub async fn spending_report_endpoint(
    State(state): State<ReportState>,
    ApiQuery(query): ApiQuery<SpendingReportQuery>,
) -> Result<Json<SpendingReport>, Error> {
    let today = get_local_date(&state.local_timezone)?;

    Ok(Json(SpendingReport {
        seq: query.seq,
        granularity: query.granularity,
        periods: spending_report(&state.transaction_store, query.granularity, today),
    }))
}

/// Get total income, total expenses and the balance.
pub async fn balance_endpoint(State(state): State<ReportState>) -> Result<Json<Balance>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_balance(&connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::State,
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use time::{Duration, OffsetDateTime, macros::date};
    use tower::ServiceExt;

    use crate::{
        AppState, Error, build_router, endpoints,
        extract::ApiQuery,
        report::{
            Granularity,
            api::{
                CategoryReportQuery, ReportState, SpendingReportQuery, balance_endpoint,
                category_report, category_report_endpoint, spending_report,
                spending_report_endpoint,
            },
        },
        test_utils::{get_test_state, parse_json_body},
        timeframe::Timeframe,
        transaction::{
            Transaction, TransactionFilter, TransactionKind, TransactionStore, create_transaction,
        },
    };

    /// Serves a fixed batch of transactions, applying the date filter.
    struct FixtureStore {
        transactions: Vec<Transaction>,
    }

    impl TransactionStore for FixtureStore {
        fn get_transactions(
            &self,
            kind: TransactionKind,
            filter: &TransactionFilter,
        ) -> Result<Vec<Transaction>, Error> {
            Ok(self
                .transactions
                .iter()
                .filter(|transaction| transaction.kind == kind)
                .filter(|transaction| filter.since.is_none_or(|since| transaction.date >= since))
                .cloned()
                .collect())
        }
    }

    struct FailingStore;

    impl TransactionStore for FailingStore {
        fn get_transactions(
            &self,
            _kind: TransactionKind,
            _filter: &TransactionFilter,
        ) -> Result<Vec<Transaction>, Error> {
            Err(Error::DatabaseLockError)
        }
    }

    fn transaction(
        kind: TransactionKind,
        category: &str,
        amount: f64,
        date: time::Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            amount,
            category: category.to_owned(),
            date,
            notes: None,
            kind,
        }
    }

    fn fixture_store() -> FixtureStore {
        FixtureStore {
            transactions: vec![
                transaction(TransactionKind::Expense, "Food", 20.0, date!(2025 - 05 - 03)),
                transaction(TransactionKind::Expense, "Rent", 400.0, date!(2025 - 05 - 01)),
                transaction(TransactionKind::Expense, "Food", 5.0, date!(2025 - 04 - 28)),
                transaction(TransactionKind::Expense, "Travel", 900.0, date!(2023 - 01 - 10)),
                transaction(TransactionKind::Income, "Salary", 3000.0, date!(2025 - 05 - 01)),
            ],
        }
    }

    #[test]
    fn category_report_uses_timeframe() {
        let store = fixture_store();
        let today = date!(2025 - 05 - 10);

        let this_month = category_report(&store, Timeframe::Month, today);
        let five_years = category_report(&store, Timeframe::Year, today);

        assert_eq!(this_month.len(), 2);
        assert_eq!(this_month[0].category, "Rent");
        assert_eq!(this_month[1].total, 20.0);
        assert_eq!(five_years[0].category, "Travel");
        assert_eq!(five_years.len(), 3);
    }

    #[test]
    fn category_report_ignores_income() {
        let store = fixture_store();

        let got = category_report(&store, Timeframe::Default, date!(2025 - 05 - 10));

        assert!(got.iter().all(|summary| summary.category != "Salary"));
    }

    #[test]
    fn failed_fetch_gives_empty_reports() {
        let today = date!(2025 - 05 - 10);

        let categories = category_report(&FailingStore, Timeframe::Default, today);
        let periods = spending_report(&FailingStore, Granularity::Month, today);

        assert!(categories.is_empty());
        assert_eq!(periods.len(), 12);
        assert!(periods.iter().all(|period| period.total == 0.0));
    }

    #[test]
    fn spending_report_buckets_by_month() {
        let store = fixture_store();

        let got = spending_report(&store, Granularity::Month, date!(2025 - 05 - 10));

        let may = got.last().unwrap();
        let april = &got[got.len() - 2];
        assert_eq!(may.period_label, "May 2025");
        assert_eq!(may.total, 420.0);
        assert_eq!(april.period_label, "Apr 2025");
        assert_eq!(april.total, 5.0);
    }

    fn get_state(app_state: &AppState) -> ReportState {
        ReportState {
            transaction_store: app_state.transaction_store(),
            db_connection: app_state.db_connection.clone(),
            local_timezone: app_state.local_timezone.clone(),
        }
    }

    fn insert(app_state: &AppState, kind: TransactionKind, category: &str, amount: f64) {
        let today = OffsetDateTime::now_utc().date();
        create_transaction(
            Transaction::build(kind, amount, today - Duration::days(1), category),
            &app_state.db_connection.lock().unwrap(),
        )
        .expect("Could not create transaction");
    }

    #[tokio::test]
    async fn category_endpoint_echoes_seq() {
        let app_state = get_test_state();
        insert(&app_state, TransactionKind::Expense, "Food", 12.0);

        let response = category_report_endpoint(
            State(get_state(&app_state)),
            ApiQuery(CategoryReportQuery {
                time_frame: Timeframe::Default,
                seq: Some(7),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["seq"], 7);
        assert_eq!(body["categories"][0]["category"], "Food");
        assert_eq!(body["categories"][0]["count"], 1);
        assert_eq!(body["categories"][0]["ratio"], 1.0);
    }

    #[tokio::test]
    async fn category_endpoint_omits_missing_seq() {
        let app_state = get_test_state();

        let response = category_report_endpoint(
            State(get_state(&app_state)),
            ApiQuery(CategoryReportQuery::default()),
        )
        .await
        .into_response();

        let body = parse_json_body(response).await;
        assert!(body.get("seq").is_none());
        assert_eq!(body["categories"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_numeric_seq_is_json_bad_request() {
        let app = build_router(get_test_state());

        let response = app
            .oneshot(
                Request::get(format!("{}?seq=abc", endpoints::CATEGORY_REPORT))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        let message = body["error"].as_str().expect("error should be a string");
        assert!(message.starts_with("Invalid request:"), "got {message}");
    }

    #[tokio::test]
    async fn spending_endpoint_returns_zero_filled_periods() {
        let app_state = get_test_state();
        insert(&app_state, TransactionKind::Expense, "Food", 12.0);

        let response = spending_report_endpoint(
            State(get_state(&app_state)),
            ApiQuery(SpendingReportQuery {
                granularity: Granularity::Year,
                seq: Some(3),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["seq"], 3);
        assert_eq!(body["granularity"], "year");
        let periods = body["periods"].as_array().unwrap();
        assert_eq!(periods.len(), 5);
        let total: f64 = periods
            .iter()
            .map(|period| period["total"].as_f64().unwrap())
            .sum();
        assert_eq!(total, 12.0);
    }

    #[tokio::test]
    async fn balance_is_income_minus_expenses() {
        let app_state = get_test_state();
        insert(&app_state, TransactionKind::Income, "Salary", 1000.0);
        insert(&app_state, TransactionKind::Expense, "Rent", 400.0);
        insert(&app_state, TransactionKind::Expense, "Food", 100.0);

        let response = balance_endpoint(State(get_state(&app_state)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["income"], 1000.0);
        assert_eq!(body["expenses"], 500.0);
        assert_eq!(body["balance"], 500.0);
    }
}
