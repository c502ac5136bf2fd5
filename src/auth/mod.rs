//! Session tokens and the authorization middleware that guards protected routes.

mod middleware;
mod token;

pub use middleware::{AuthState, AuthenticatedUser, auth_guard};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, issue_token, validate_token};
