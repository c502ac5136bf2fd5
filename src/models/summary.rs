//! This file defines the `Summary` type, a derived aggregate over a user's transactions.

use serde::Serialize;

/// The income, expense, and balance totals for a user over a date range.
///
/// Computed on demand, never persisted. A range with no transactions yields
/// zeros rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income transactions in the range.
    pub total_income: f64,
    /// The sum of all expense transactions in the range.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}
