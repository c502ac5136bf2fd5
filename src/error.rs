//! Defines the app level error type and its conversion to JSON error envelopes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::routes::ErrorResponse;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email or password did not match a registered user.
    ///
    /// The message is deliberately identical for an unknown email and a wrong
    /// password so that clients cannot probe which emails are registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Rejected input that does not fit a more specific variant, e.g. a
    /// malformed query parameter. The message is shown to the client.
    #[error("{0}")]
    Validation(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID used to create a transaction did not match a category
    /// owned by the requesting user.
    #[error("category does not exist or access denied")]
    InvalidCategory,

    /// A transaction was created with a zero or negative amount.
    #[error("amount must be greater than 0")]
    InvalidAmount,

    /// The email used to register is already taken.
    #[error("user already exists")]
    DuplicateEmail,

    /// The category name is already used by the same user.
    #[error("category already exists")]
    DuplicateCategoryName,

    /// The transaction could not be found, or belongs to another user.
    ///
    /// Both cases produce the same response so that clients cannot probe
    /// other users' transaction IDs.
    #[error("transaction not found")]
    TransactionNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error is replaced
    /// with a generic internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A token could not be signed or encoded.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a response body as JSON.
    #[error("json serialization error: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category") =>
            {
                Error::DuplicateCategoryName
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidCategory
            }
            // Code 275 occurs when a CHECK constraint failed, and the only
            // CHECK in the schema is the positive-amount rule.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 275 =>
            {
                Error::InvalidAmount
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Validation(_)
            | Error::EmptyCategoryName
            | Error::InvalidCategory
            | Error::InvalidAmount
            | Error::JSONSerializationError(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail | Error::DuplicateCategoryName => StatusCode::CONFLICT,
            Error::TransactionNotFound | Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_) | Error::TokenCreation(_) | Error::SqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
