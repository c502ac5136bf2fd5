//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, UserID},
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore {
    /// Create a new category owned by `user_id` and add it to the store.
    ///
    /// Returns [Error::DuplicateCategoryName] if the user already has a
    /// category with this name. The same name owned by a different user is
    /// not a conflict.
    fn create(
        &mut self,
        user_id: UserID,
        name: CategoryName,
        description: Option<String>,
    ) -> Result<Category, Error>;

    /// Whether a category with `category_id` exists and is owned by `user_id`.
    ///
    /// Only errors on storage failure, never on a missing row.
    fn exists(&self, user_id: UserID, category_id: DatabaseID) -> Result<bool, Error>;

    /// Get all categories owned by `user_id`.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error>;
}
