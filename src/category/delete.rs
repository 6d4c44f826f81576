//! Category deletion endpoints.

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
    category::{Category, CategoryKind, DeleteCategoryForm, db::delete_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body sent back after a category is deleted.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryDeleted {
    /// Always `true`.
    pub success: bool,
    /// The rows that were removed.
    pub deleted: Vec<Category>,
}

/// Delete an expense category by ID.
///
/// Transactions keep their category text, so existing expenses are unchanged.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    ApiJson(form): ApiJson<DeleteCategoryForm>,
) -> Result<Json<CategoryDeleted>, Error> {
    delete(CategoryKind::Expense, form, &state)
}

/// Delete an income category by ID.
pub async fn delete_income_category_endpoint(
    State(state): State<DeleteCategoryState>,
    ApiJson(form): ApiJson<DeleteCategoryForm>,
) -> Result<Json<CategoryDeleted>, Error> {
    delete(CategoryKind::Income, form, &state)
}

fn delete(
    kind: CategoryKind,
    form: DeleteCategoryForm,
    state: &DeleteCategoryState,
) -> Result<Json<CategoryDeleted>, Error> {
    let id = form.id.ok_or(Error::MissingField("id"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let deleted = delete_category(id, kind, &connection).inspect_err(|error| match error {
        Error::DeleteMissingCategory => {
            tracing::info!("No category found in {} with ID {id}", kind.table_name())
        }
        error => {
            tracing::error!("An unexpected error occurred while deleting category {id}: {error}")
        }
    })?;

    Ok(Json(CategoryDeleted {
        success: true,
        deleted,
    }))
}
