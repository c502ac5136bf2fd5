//! This module defines the domain models and their supporting types.

mod category;
mod password;
mod summary;
mod transaction;
mod user;

pub use category::{Category, CategoryName};
pub use password::{PasswordHash, ValidatedPassword};
pub use summary::Summary;
pub use transaction::{NewTransaction, Transaction};
pub use user::{User, UserID};

/// An alias for the integer type used for database primary keys.
pub type DatabaseID = i64;
