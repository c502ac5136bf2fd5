//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, named_params, params_from_iter, types::Type, types::Value};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransaction, Summary, Transaction, UserID},
    stores::{TransactionQuery, TransactionStore},
    stores::sqlite::{format_timestamp, parse_timestamp},
};

/// Handles the creation, retrieval, and deletion of transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

fn format_day(date: Date) -> Result<String, Error> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|error| Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into())))
}

/// The timestamp at which `date` begins, for inclusive lower bounds.
fn day_start(date: Date) -> Result<String, Error> {
    Ok(format!("{} 00:00:00", format_day(date)?))
}

/// The last stored timestamp within `date`, for inclusive upper bounds.
fn day_end(date: Date) -> Result<String, Error> {
    Ok(format!("{} 23:59:59", format_day(date)?))
}

impl TransactionStore for SQLiteTransactionStore {
    /// Record a new transaction for `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `transaction.amount` is not greater than zero,
    /// [Error::InvalidCategory] if `transaction.category_id` does not refer to an
    /// existing category, or [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let created_at = OffsetDateTime::now_utc();
        let created_at_text = format_timestamp(created_at)
            .map_err(|error| Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into())))?;

        connection.execute(
            "INSERT INTO \"transaction\" (is_income, amount, category_id, user_id, note, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                transaction.is_income,
                transaction.amount,
                transaction.category_id,
                user_id.as_i64(),
                &transaction.note,
                &created_at_text,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Transaction {
            id,
            is_income: transaction.is_income,
            amount: transaction.amount,
            category_id: transaction.category_id,
            user_id,
            note: transaction.note,
            created_at: parse_timestamp(&created_at_text).map_err(|error| {
                Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into()))
            })?,
        })
    }

    /// Retrieve the transaction with `id` owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, is_income, amount, category_id, user_id, note, created_at
                    FROM \"transaction\"
                    WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                SQLiteTransactionStore::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
                error => error.into(),
            })
    }

    /// Retrieve transactions owned by `user_id` in the way defined by `query`.
    ///
    /// The optional filters are ANDed together on top of the ownership
    /// predicate, and rows are returned newest first.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_query(
        &self,
        user_id: UserID,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error> {
        let mut sql = String::from(
            "SELECT id, is_income, amount, category_id, user_id, note, created_at
                FROM \"transaction\"
                WHERE user_id = ?",
        );
        let mut params: Vec<Value> = vec![Value::from(user_id.as_i64())];

        if let Some(is_income) = query.is_income {
            sql.push_str(" AND is_income = ?");
            params.push(Value::from(is_income));
        }

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            params.push(Value::from(category_id));
        }

        if let Some(from) = query.from {
            sql.push_str(" AND created_at >= ?");
            params.push(Value::from(day_start(from)?));
        }

        if let Some(to) = query.to {
            sql.push_str(" AND created_at <= ?");
            params.push(Value::from(day_end(to)?));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Value::from(i64::try_from(query.limit).unwrap_or(i64::MAX)));
        params.push(Value::from(i64::try_from(query.offset).unwrap_or(i64::MAX)));

        self.connection
            .lock()
            .unwrap()
            .prepare(&sql)?
            .query_map(params_from_iter(params), SQLiteTransactionStore::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Delete the transaction with `id` owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::TransactionNotFound] when no row was deleted.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )?;

        if rows_deleted == 0 {
            Err(Error::TransactionNotFound)
        } else {
            Ok(())
        }
    }

    /// Aggregate income, expense, and balance for `user_id` over `[from, to]`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn summary(&self, user_id: UserID, from: Date, to: Date) -> Result<Summary, Error> {
        let start = day_start(from)?;
        let end = day_end(to)?;

        let (total_income, total_expense) = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT
                        COALESCE(SUM(CASE WHEN is_income THEN amount ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN is_income THEN 0 ELSE amount END), 0)
                    FROM \"transaction\"
                    WHERE user_id = :user_id
                        AND created_at >= :start AND created_at <= :end",
            )?
            .query_row(
                named_params! {
                    ":user_id": user_id.as_i64(),
                    ":start": start,
                    ":end": end,
                },
                |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
            )?;

        Ok(Summary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        })
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    is_income BOOLEAN NOT NULL,
                    amount REAL NOT NULL CHECK(amount > 0),
                    category_id INTEGER NOT NULL,
                    user_id INTEGER NOT NULL,
                    note TEXT,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let is_income = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;
        let category_id = row.get(offset + 3)?;
        let raw_user_id = row.get(offset + 4)?;
        let note: Option<String> = row.get(offset + 5)?;
        let raw_created_at: String = row.get(offset + 6)?;

        let created_at = parse_timestamp(&raw_created_at).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 6, Type::Text, error.into())
        })?;

        Ok(Self::ReturnType {
            id,
            is_income,
            amount,
            category_id,
            user_id: UserID::new(raw_user_id),
            note,
            created_at,
        })
    }
}
