//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, UserID},
    stores::CategoryStore,
};

/// Handles the creation and retrieval of transaction categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateCategoryName] if the user already has a category
    /// called `name`, or [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        user_id: UserID,
        name: CategoryName,
        description: Option<String>,
    ) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO category (name, description, user_id) VALUES (?1, ?2, ?3)",
            (name.as_ref(), &description, user_id.as_i64()),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            name,
            description,
            user_id,
        })
    }

    /// Check whether the category `category_id` exists and is owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn exists(&self, user_id: UserID, category_id: DatabaseID) -> Result<bool, Error> {
        let row: Option<i64> = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT 1 FROM category WHERE id = :id AND user_id = :user_id")?
            .query_row(
                &[(":id", &category_id), (":user_id", &user_id.as_i64())],
                |row| row.get(0),
            )
            .optional()?;

        Ok(row.is_some())
    }

    /// Get all categories owned by `user_id`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, name, description, user_id FROM category
                    WHERE user_id = :user_id
                    ORDER BY id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], SQLiteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    user_id INTEGER NOT NULL,
                    UNIQUE(user_id, name),
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let description: Option<String> = row.get(offset + 2)?;
        let raw_user_id = row.get(offset + 3)?;

        Ok(Self::ReturnType {
            id,
            name: CategoryName::new_unchecked(&raw_name),
            description,
            user_id: UserID::new(raw_user_id),
        })
    }
}
