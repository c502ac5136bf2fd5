//! Authorization middleware that validates bearer tokens on protected routes.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::DecodingKey;

use crate::{
    auth::validate_token,
    models::UserID,
    routes::ErrorResponse,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify token signatures.
    pub decoding_key: DecodingKey,
}

/// The verified identity of the requesting user.
///
/// Inserted into the request extensions by [auth_guard]; route handlers
/// receive it via `Extension(user): Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    /// The ID of the authenticated user.
    pub user_id: UserID,
    /// The email of the authenticated user.
    pub email: String,
}

/// The ways a request can fail the auth gate. All map to 401.
#[derive(Debug, PartialEq)]
enum AuthError {
    MissingHeader,
    MalformedHeader,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingHeader => "authorization header required",
            AuthError::MalformedHeader => "invalid authorization format",
            AuthError::InvalidToken => "invalid token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: message.to_owned(),
            }),
        )
            .into_response()
    }
}

/// Middleware function that checks for a valid `Authorization: Bearer <token>` header.
///
/// The verified identity is placed into the request extensions and the request
/// executed normally if the token is valid, otherwise a 401 JSON error
/// envelope is returned. An invalid or expired token never produces a 500.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<AuthenticatedUser>` to receive the identity.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = match request.headers().get(AUTHORIZATION) {
        Some(value) => value,
        None => return AuthError::MissingHeader.into_response(),
    };

    let header_text = match header_value.to_str() {
        Ok(text) => text,
        Err(_) => return AuthError::MalformedHeader.into_response(),
    };

    let token = match header_text.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => token,
        _ => return AuthError::MalformedHeader.into_response(),
    };

    let claims = match validate_token(token, &state.decoding_key) {
        Ok(claims) => claims,
        Err(_) => return AuthError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id(),
        email: claims.email,
    });

    next.run(request).await
}
