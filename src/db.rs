/*! This module defines and implements traits for setting up the application's database. */

use std::time::Duration;

use rusqlite::{Connection, Row};

use crate::stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore};

/// How long a storage call may wait on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type that the row is mapped to.
    type ReturnType;

    /// Map `row` to `Self::ReturnType` starting from the first column.
    ///
    /// # Errors
    /// Returns an error if a column is missing or cannot be converted.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Map `row` to `Self::ReturnType` starting from the column at `offset`.
    ///
    /// # Errors
    /// Returns an error if a column is missing or cannot be converted.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the domain models and set the per-call `busy_timeout`
/// used as the execution budget for storage calls.
///
/// # Errors
/// Returns an error if the tables could not be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection, busy_timeout: Duration) -> Result<(), rusqlite::Error> {
    connection.busy_timeout(busy_timeout)?;
    connection.pragma_update(None, "foreign_keys", "ON")?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}
