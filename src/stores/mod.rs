//! Contains traits and implementations for objects that store the domain [models](crate::models).
//!
//! Every operation on user-owned data takes the owning [UserID](crate::models::UserID)
//! as a mandatory parameter; per-user isolation is enforced here, not in the
//! request handlers.

mod category;
mod transaction;
mod user;

pub mod sqlite;

pub use category::CategoryStore;
pub use transaction::{TransactionQuery, TransactionStore};
pub use user::UserStore;
