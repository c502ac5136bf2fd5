//! The handler for summarising a user's income and expenses over a date range.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    Error,
    auth::AuthenticatedUser,
    routes::{json_response, parse_date},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The query parameters of the summary endpoint. Both dates are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    /// The first day of the range, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// The last day of the range, `YYYY-MM-DD`.
    pub to: Option<String>,
}

/// Handler for aggregating the caller's income, expenses, and balance over an
/// inclusive date range.
///
/// A range with no transactions yields zero totals, not an error.
pub async fn get_summary<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SummaryParams>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let (Some(from), Some(to)) = (params.from, params.to) else {
        return Err(Error::Validation(
            "from and to parameters are required".to_owned(),
        ));
    };

    let from = parse_date(&from)?;
    let to = parse_date(&to)?;

    if to < from {
        return Err(Error::Validation(
            "to date must not be before from date".to_owned(),
        ));
    }

    let summary = state.transaction_store.summary(user.user_id, from, to)?;

    Ok(json_response(
        StatusCode::OK,
        "summary retrieved successfully",
        Some(summary),
    ))
}
