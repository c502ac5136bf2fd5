//! The handler for exchanging credentials for a session token.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    auth::issue_token,
    routes::{invalid_json, json_response, register::AuthPayload},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data submitted when logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInForm {
    /// The email address of the account.
    pub email: String,
    /// The plaintext password.
    pub password: String,
}

/// Handler for logging in.
///
/// # Errors
///
/// An unknown email and a wrong password both return a 401 with the exact
/// same message, so the response does not disclose whether an email is
/// registered.
pub async fn log_in<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    payload: Result<Json<LogInForm>, JsonRejection>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let Json(form) = payload.map_err(|_| invalid_json())?;

    let email = EmailAddress::from_str(&form.email).map_err(|_| Error::InvalidCredentials)?;

    let user = state
        .user_store
        .get_by_email(&email)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_matches = user
        .password_hash()
        .verify(&form.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_matches {
        return Err(Error::InvalidCredentials);
    }

    let token = issue_token(
        user.id(),
        user.email().as_str(),
        &state.encoding_key,
        state.token_duration,
    )?;

    Ok(json_response(
        StatusCode::OK,
        "login successful",
        Some(AuthPayload { token, user }),
    ))
}
