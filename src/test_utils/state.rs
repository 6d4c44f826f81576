use rusqlite::Connection;

use crate::AppState;

/// An app state backed by a fresh in-memory database, with UTC as the local timezone.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "Etc/UTC").expect("Could not create app state")
}
