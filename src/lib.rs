//! Pennywise is a web app for tracking personal income and expenses.
//!
//! Transactions are recorded against free-text categories and summarised into
//! spending reports: a ranked breakdown by category and a spending trend
//! bucketed by day, month or year.
//!
//! This library provides a JSON API plus a server-rendered reports page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod db;
mod endpoints;
mod extract;
mod html;
mod logging;
mod report;
mod routing;
mod timeframe;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{Category, CategoryKind, CategoryName};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{
    Balance, CategorySummary, Granularity, MAX_SUMMARY_CATEGORIES, PeriodTotal, RequestTicket,
    ResponseSequencer, aggregate_by_period, category_report, spending_report,
    summarize_by_category,
};
pub use routing::build_router;
pub use timeframe::{Timeframe, resolve_start_date};
pub use transaction::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionFilter, TransactionId,
    TransactionKind, TransactionStore,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request was missing a field that is required, e.g. the amount of an
    /// expense or the ID of the row to delete.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A request body or query string could not be parsed, e.g. the body was
    /// not JSON or a field had the wrong type.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A transaction amount was negative.
    ///
    /// Whether money was spent or earned is recorded by the kind of the
    /// transaction, so amounts are always zero or greater.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(f64),

    /// An empty string was used to create a category name.
    #[error("Category name is required")]
    EmptyCategoryName,

    /// The category name already exists for this kind of category.
    ///
    /// Names are matched exactly, so "Food" and "food" are different categories.
    #[error("Category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist.
    #[error("No transaction deleted. Check id.")]
    DeleteMissingTransaction,

    /// Tried to delete a category that does not exist.
    #[error("No category deleted. Check id.")]
    DeleteMissingCategory,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code a client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidRequest(_)
            | Error::NegativeAmount(_)
            | Error::EmptyCategoryName
            | Error::DuplicateCategory(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::DeleteMissingTransaction | Error::DeleteMissingCategory => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // Backend failures are logged here and not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn get_json_body(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");

        (
            status,
            serde_json::from_slice(&body).expect("Could not parse body as JSON"),
        )
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = get_json_body(Error::MissingField("amount")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: amount");
    }

    #[tokio::test]
    async fn invalid_requests_are_bad_requests() {
        let (status, body) =
            get_json_body(Error::InvalidRequest("expected a number".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request: expected a number");
    }

    #[tokio::test]
    async fn duplicate_category_is_a_bad_request() {
        let (status, body) = get_json_body(Error::DuplicateCategory("Food".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Category \"Food\" already exists");
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let (status, _) = get_json_body(Error::DeleteMissingTransaction).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn backend_errors_hide_details() {
        let (status, body) = get_json_body(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !body["error"]
                .as_str()
                .expect("error should be a string")
                .contains("SQL")
        );
    }
}
