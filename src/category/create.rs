//! Endpoints for adding expense and income categories.

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
    category::{Category, CategoryForm, CategoryKind, CategoryName, db::create_category},
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body sent back after a category is added.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCreated {
    /// A human readable confirmation.
    pub message: String,
    /// The stored category.
    pub category: Category,
}

/// Add an expense category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Json<CategoryCreated>, Error> {
    create(CategoryKind::Expense, form, &state)
}

/// Add an income category.
pub async fn create_income_category_endpoint(
    State(state): State<CreateCategoryState>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Json<CategoryCreated>, Error> {
    create(CategoryKind::Income, form, &state)
}

fn create(
    kind: CategoryKind,
    form: CategoryForm,
    state: &CreateCategoryState,
) -> Result<Json<CategoryCreated>, Error> {
    let name = CategoryName::new(form.category_name.as_deref().unwrap_or_default())?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(name, kind, &connection).inspect_err(|error| match error {
        Error::DuplicateCategory(name) => {
            tracing::info!("Rejected duplicate category \"{name}\" in {}", kind.table_name())
        }
        error => tracing::error!("Could not create category: {error}"),
    })?;

    tracing::info!(
        "Created category {} \"{}\" in {}",
        category.id,
        category.category_name,
        kind.table_name()
    );

    Ok(Json(CategoryCreated {
        message: "Category added successfully".to_owned(),
        category,
    }))
}
