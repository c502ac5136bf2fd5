//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
    stores::sqlite::{format_timestamp, parse_timestamp},
};

/// Handles the creation and retrieval of users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if `email` is already registered, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, email: EmailAddress, password_hash: PasswordHash) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        let created_at = OffsetDateTime::now_utc();
        let created_at_text = format_timestamp(created_at)
            .map_err(|error| Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into())))?;

        connection.execute(
            "INSERT INTO user (email, password, created_at) VALUES (?1, ?2, ?3)",
            (&email.to_string(), password_hash.to_string(), &created_at_text),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        // Re-read so the returned timestamp is exactly what was stored.
        Ok(User::new(
            id,
            email,
            password_hash,
            parse_timestamp(&created_at_text).map_err(|error| {
                Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into()))
            })?,
        ))
    }

    /// Get the user from the database that has the specified `id`, or return
    /// [Error::NotFound] if no such user exists.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, password, created_at FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `email` address,
    /// or return [Error::NotFound] if no such user exists.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, password, created_at FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], SQLiteUserStore::map_row)
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_email: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;
        let raw_created_at: String = row.get(offset + 3)?;

        let id = UserID::new(raw_id);
        let email = EmailAddress::new_unchecked(raw_email);
        let password_hash = PasswordHash::new_unchecked(&raw_password_hash);
        let created_at = parse_timestamp(&raw_created_at).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, error.into())
        })?;

        Ok(Self::ReturnType::new(id, email, password_hash, created_at))
    }
}
