//! Defines the state of the application which is shared across request handlers.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::Duration;

use crate::{
    auth::{AuthState, DEFAULT_TOKEN_DURATION},
    stores::{
        CategoryStore, TransactionStore, UserStore,
        sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore},
    },
};

/// The state of the application which is shared across all request handlers.
///
/// Cloning is cheap: the stores share one database connection internally, and
/// the keys are reference counted.
#[derive(Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// The store for transaction categories.
    pub category_store: C,
    /// The store for transactions.
    pub transaction_store: T,
    /// The store for users.
    pub user_store: U,
    /// The key used to sign session tokens.
    pub encoding_key: EncodingKey,
    /// The key used to verify session token signatures.
    pub decoding_key: DecodingKey,
    /// How long issued tokens remain valid.
    pub token_duration: Duration,
}

/// The app state as served by the SQLite backed stores.
pub type SQLiteAppState = AppState<SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore>;

impl SQLiteAppState {
    /// Create the application state over an initialized database connection.
    ///
    /// `token_secret` signs and verifies session tokens, so it must be stable
    /// across restarts for issued tokens to survive a restart.
    pub fn new(connection: Connection, token_secret: &str) -> Self {
        let connection = Arc::new(Mutex::new(connection));

        Self {
            category_store: SQLiteCategoryStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection.clone()),
            user_store: SQLiteUserStore::new(connection),
            encoding_key: EncodingKey::from_secret(token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(token_secret.as_bytes()),
            token_duration: DEFAULT_TOKEN_DURATION,
        }
    }
}

impl<C, T, U> FromRef<AppState<C, T, U>> for AuthState
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        AuthState {
            decoding_key: state.decoding_key.clone(),
        }
    }
}
