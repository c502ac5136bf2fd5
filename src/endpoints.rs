//! Defines the app's routes as constants to avoid inconsistencies between the
//! route definitions and the paths used elsewhere (e.g. tests).

/// Create a new user account.
pub const REGISTER: &str = "/auth/register";
/// Exchange credentials for a session token.
pub const LOG_IN: &str = "/auth/login";
/// Create (POST) or list (GET) the caller's transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// Fetch (GET) or delete (DELETE) a single transaction by `?id=`.
pub const TRANSACTION: &str = "/transaction/";
/// Create (POST) or list (GET) the caller's categories.
pub const CATEGORIES: &str = "/categories";
/// Aggregate the caller's income and expenses over a date range.
pub const SUMMARY: &str = "/summary";
