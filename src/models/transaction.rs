//! This file defines the `Transaction` type, an income or expense recorded by a user.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// An income or expense recorded by a user.
///
/// `created_at` is assigned by the server when the row is inserted and is
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction in the database.
    pub id: DatabaseID,
    /// Whether the transaction is income (`true`) or an expense (`false`).
    pub is_income: bool,
    /// The transaction amount. Always greater than zero.
    pub amount: f64,
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseID,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// An optional free-form note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to record a new transaction.
///
/// The owning user is passed separately so that a store operation can never be
/// called without naming the owner, and the creation timestamp is assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// Whether the transaction is income (`true`) or an expense (`false`).
    pub is_income: bool,
    /// The transaction amount. Must be greater than zero.
    pub amount: f64,
    /// The ID of a category owned by the same user.
    pub category_id: DatabaseID,
    /// An optional free-form note.
    #[serde(default)]
    pub note: Option<String>,
}
