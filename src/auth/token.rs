//! Issues and validates the signed, time-bound tokens that identify a user.
//!
//! Tokens are self-contained: validity is purely signature plus expiry, there
//! is no revocation list.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long a token is valid for after issuance.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// The email of the authenticated user.
    pub email: String,
    /// The expiry as a unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// The ID of the authenticated user.
    pub fn user_id(&self) -> UserID {
        UserID::new(self.sub)
    }
}

/// Create a signed token for `user_id` that expires `duration` from now.
///
/// # Errors
///
/// This function will return an error if the claims could not be encoded or
/// signed, which should not happen with a valid key.
pub fn issue_token(
    user_id: UserID,
    email: &str,
    encoding_key: &EncodingKey,
    duration: Duration,
) -> Result<String, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;

    let claims = Claims {
        sub: user_id.as_i64(),
        email: email.to_owned(),
        exp: expires_at.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Check a token's signature and expiry, and extract its claims.
///
/// # Errors
///
/// This function will return [Error::InvalidCredentials] if the token is
/// malformed, the signature does not verify, or the embedded expiry has
/// passed.
pub fn validate_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| Error::InvalidCredentials)
}
