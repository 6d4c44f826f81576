//! Endpoints for listing categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryKind, db::get_all_categories},
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the expense categories in alphabetical order.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesState>,
) -> Result<Json<Vec<Category>>, Error> {
    list(CategoryKind::Expense, &state).map(Json)
}

/// List the income categories in alphabetical order.
pub async fn list_income_categories_endpoint(
    State(state): State<ListCategoriesState>,
) -> Result<Json<Vec<Category>>, Error> {
    list(CategoryKind::Income, &state).map(Json)
}

fn list(kind: CategoryKind, state: &ListCategoriesState) -> Result<Vec<Category>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_categories(kind, &connection)
}
