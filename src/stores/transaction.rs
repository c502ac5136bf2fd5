//! Defines the transaction store trait.

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Summary, Transaction, UserID},
};

/// Handles the creation, retrieval, and deletion of transactions.
///
/// Every operation is scoped to the owning user: a transaction owned by
/// another user behaves exactly as if it did not exist.
pub trait TransactionStore {
    /// Record a new transaction for `user_id`.
    ///
    /// The caller must have verified that `transaction.category_id` refers to
    /// a category owned by `user_id` (see
    /// [CategoryStore::exists](crate::stores::CategoryStore::exists)).
    /// Returns the created row with its assigned ID and server timestamp.
    fn create(&mut self, user_id: UserID, transaction: NewTransaction)
    -> Result<Transaction, Error>;

    /// Retrieve the transaction with `id` owned by `user_id`.
    ///
    /// Returns [Error::TransactionNotFound] if the row is absent or owned by
    /// another user.
    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve transactions owned by `user_id` in the way defined by `query`,
    /// ordered by creation time descending.
    fn get_query(&self, user_id: UserID, query: TransactionQuery)
    -> Result<Vec<Transaction>, Error>;

    /// Delete the transaction with `id` owned by `user_id`.
    ///
    /// Returns [Error::TransactionNotFound] when no row was deleted, i.e. the
    /// row is absent or owned by another user.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error>;

    /// Aggregate income, expense, and balance for `user_id` over the inclusive
    /// day range `[from, to]`. Yields zeros when no rows match.
    fn summary(&self, user_id: UserID, from: Date, to: Date) -> Result<Summary, Error>;
}

/// Defines which transactions to fetch from [TransactionStore::get_query].
///
/// The optional filters are combined conjunctively on top of the mandatory
/// ownership predicate. The date bounds are independent, so either one on its
/// own selects an open-ended range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include only income (`Some(true)`) or only expense (`Some(false)`)
    /// transactions.
    pub is_income: Option<bool>,
    /// Include only transactions in this category.
    pub category_id: Option<DatabaseID>,
    /// Include only transactions created on or after this day.
    pub from: Option<Date>,
    /// Include only transactions created on or before this day.
    pub to: Option<Date>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: u64,
    /// The number of rows to skip before collecting results.
    pub offset: u64,
}
