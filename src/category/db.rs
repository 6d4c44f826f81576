//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryKind, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// Uniqueness is enforced by the table's `UNIQUE` constraint in the same
/// statement as the insert, so two concurrent requests for the same name
/// cannot both succeed.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if a category of `kind` already has the name `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    let query = format!(
        "INSERT INTO {} (category_name) VALUES (?1) RETURNING id, category_name;",
        kind.table_name()
    );

    connection
        .prepare(&query)?
        .query_row((name.as_ref(),), map_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategory(name.to_string()),
            error => error.into(),
        })
}

/// Retrieve a single category by ID.
#[cfg(test)]
pub fn get_category(
    category_id: CategoryId,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Category, Error> {
    let query = format!(
        "SELECT id, category_name FROM {} WHERE id = :id;",
        kind.table_name()
    );

    connection
        .prepare(&query)?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories of `kind` ordered alphabetically by name.
pub fn get_all_categories(
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let query = format!(
        "SELECT id, category_name FROM {} ORDER BY category_name ASC;",
        kind.table_name()
    );

    connection
        .prepare(&query)?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category by ID and return the deleted rows.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingCategory] if no category of `kind` has the ID `category_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    category_id: CategoryId,
    kind: CategoryKind,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let query = format!(
        "DELETE FROM {} WHERE id = ?1 RETURNING id, category_name;",
        kind.table_name()
    );

    let deleted = connection
        .prepare(&query)?
        .query_map([category_id], map_row)?
        .collect::<Result<Vec<Category>, rusqlite::Error>>()?;

    if deleted.is_empty() {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(deleted)
}

/// Count the categories of `kind`.
#[cfg(test)]
pub fn count_categories(kind: CategoryKind, connection: &Connection) -> Result<u32, Error> {
    let query = format!("SELECT COUNT(id) FROM {};", kind.table_name());

    connection
        .query_row(&query, [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the category tables and indexes.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in [CategoryKind::Expense, CategoryKind::Income] {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY,
                    category_name TEXT NOT NULL UNIQUE
                );",
                kind.table_name()
            ),
            (),
        )?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let category_name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, category_name })
}
