//! The handler for creating a new user account.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::issue_token,
    models::{PasswordHash, User, ValidatedPassword},
    routes::{invalid_json, json_response},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data submitted when registering a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    /// The email address to register, e.g. `alice@example.com`.
    pub email: String,
    /// The plaintext password. Hashed before it is stored.
    pub password: String,
}

/// The payload returned by register and login: a session token and the
/// account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    /// The bearer token for subsequent requests.
    pub token: String,
    /// The account, without its password hash.
    pub user: User,
}

/// Parse and validate an email address from a register form.
///
/// On top of the RFC grammar this requires a dot in the domain, so bare
/// hostnames such as `alice@localhost` are rejected.
pub(crate) fn parse_email(text: &str) -> Result<EmailAddress, Error> {
    let invalid = || Error::Validation("invalid email format".to_owned());

    let email = EmailAddress::from_str(text).map_err(|_| invalid())?;

    if !email.domain().contains('.') {
        return Err(invalid());
    }

    Ok(email)
}

/// Handler for creating a new user account.
///
/// On success the account is created and immediately logged in: the response
/// carries a session token alongside the new user.
///
/// # Errors
///
/// Returns a 400 for a malformed body, email, or too-short password, a 409 if
/// the email is already registered, and a 500 if hashing or token signing
/// fails unexpectedly.
pub async fn register<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    payload: Result<Json<RegisterForm>, JsonRejection>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let Json(form) = payload.map_err(|_| invalid_json())?;

    let email = parse_email(&form.email)?;
    let password = ValidatedPassword::new(&form.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store.create(email, password_hash)?;

    let token = issue_token(
        user.id(),
        user.email().as_str(),
        &state.encoding_key,
        state.token_duration,
    )?;

    Ok(json_response(
        StatusCode::CREATED,
        "user registered successfully",
        Some(AuthPayload { token, user }),
    ))
}
