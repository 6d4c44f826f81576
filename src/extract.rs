//! Extractors for the JSON API that answer malformed requests with an [Error]
//! body instead of axum's plain text rejections.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, QueryRejection},
};

use crate::Error;

/// A JSON request body.
///
/// Works like [axum::Json], but a body that is not JSON or does not fit `T`
/// is rejected with [Error::InvalidRequest].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// A query string.
///
/// Works like [axum::extract::Query], but a query string that does not fit `T`
/// is rejected with [Error::InvalidRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}
