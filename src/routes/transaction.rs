//! The handlers for creating, listing, fetching, and deleting transactions.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    Error,
    auth::AuthenticatedUser,
    models::{DatabaseID, NewTransaction},
    pagination::Page,
    routes::{invalid_json, json_response, parse_date},
    state::AppState,
    stores::{CategoryStore, TransactionQuery, TransactionStore, UserStore},
};

/// Handler for recording a new transaction.
///
/// # Errors
///
/// Returns a 400 if the amount is not positive or the category does not
/// belong to the caller.
pub async fn create_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let Json(new_transaction) = payload.map_err(|_| invalid_json())?;

    if new_transaction.amount <= 0.0 {
        return Err(Error::InvalidAmount);
    }

    if !state
        .category_store
        .exists(user.user_id, new_transaction.category_id)?
    {
        return Err(Error::InvalidCategory);
    }

    let transaction = state
        .transaction_store
        .create(user.user_id, new_transaction)?;

    Ok(json_response(
        StatusCode::CREATED,
        "transaction added successfully",
        Some(transaction),
    ))
}

/// The raw query parameters of the transaction list endpoint.
///
/// Everything is accepted as text so that validation errors produce the API's
/// own 400 envelope rather than axum's default rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListParams {
    /// `"true"` for income only, `"false"` for expenses only.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Restrict the list to a single category.
    pub category_id: Option<String>,
    /// The first day of the date filter, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// The last day of the date filter, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// The page size. Required and positive.
    pub limit: Option<String>,
    /// The page number, one indexed. Zero and absent both mean the first page.
    pub offset: Option<String>,
}

impl TransactionListParams {
    /// Validate the raw parameters into a store query.
    fn into_query(self) -> Result<TransactionQuery, Error> {
        let is_income = match self.transaction_type.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                return Err(Error::Validation(
                    "type must be 'true' or 'false'".to_owned(),
                ));
            }
        };

        let category_id = match self.category_id {
            None => None,
            Some(text) => Some(text.parse::<DatabaseID>().map_err(|_| {
                Error::Validation("category_id must be a number".to_owned())
            })?),
        };

        // Either bound may be given on its own for an open-ended range.
        let from = self.from.as_deref().map(parse_date).transpose()?;
        let to = self.to.as_deref().map(parse_date).transpose()?;

        if let (Some(from), Some(to)) = (from, to)
            && to < from
        {
            return Err(Error::Validation(
                "to date must not be before from date".to_owned(),
            ));
        }

        let limit_error = || Error::Validation("limit must be a positive number".to_owned());
        let offset_error = || Error::Validation("offset must be a non-negative number".to_owned());

        let limit: i64 = self
            .limit
            .ok_or_else(limit_error)?
            .parse()
            .map_err(|_| limit_error())?;
        let page_number: i64 = self
            .offset
            .as_deref()
            .unwrap_or("0")
            .parse()
            .map_err(|_| offset_error())?;

        let page = Page::new(limit, page_number).ok_or_else(|| {
            if limit <= 0 {
                limit_error()
            } else {
                offset_error()
            }
        })?;

        Ok(TransactionQuery {
            is_income,
            category_id,
            from,
            to,
            limit: page.limit(),
            offset: page.row_offset(),
        })
    }
}

/// Handler for listing the caller's transactions, newest first.
///
/// An empty result is a 200 with an empty list, not an error.
pub async fn list_transactions<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<TransactionListParams>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let query = params.into_query()?;

    let transactions = state.transaction_store.get_query(user.user_id, query)?;

    let message = if transactions.is_empty() {
        "no transactions found"
    } else {
        "transactions listed successfully"
    };

    Ok(json_response(StatusCode::OK, message, Some(transactions)))
}

/// The query parameters of the single-transaction endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionIdParams {
    /// The ID of the transaction, as text.
    pub id: Option<String>,
}

impl TransactionIdParams {
    /// Validate the `id` parameter.
    fn parse_id(&self) -> Result<DatabaseID, Error> {
        let text = self.id.as_deref().unwrap_or("");

        if text.is_empty() {
            return Err(Error::Validation("id cannot be empty".to_owned()));
        }

        let id = text
            .parse::<DatabaseID>()
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| Error::Validation("id must be a positive number".to_owned()))?;

        Ok(id)
    }
}

/// Handler for fetching a single transaction by `?id=`.
///
/// A transaction owned by another user produces the same 404 as a missing
/// one.
pub async fn get_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<TransactionIdParams>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let id = params.parse_id()?;

    let transaction = state.transaction_store.get(user.user_id, id)?;

    Ok(json_response(
        StatusCode::OK,
        "transaction retrieved successfully",
        Some(transaction),
    ))
}

/// Handler for deleting a single transaction by `?id=`.
pub async fn delete_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<TransactionIdParams>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let id = params.parse_id()?;

    state.transaction_store.delete(user.user_id, id)?;

    Ok(json_response::<()>(
        StatusCode::OK,
        "transaction deleted successfully",
        None,
    ))
}

#[cfg(test)]
mod transaction_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        db::{self, DEFAULT_BUSY_TIMEOUT},
        endpoints,
        routing::build_router,
        state::SQLiteAppState,
    };

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        db::initialize(&conn, DEFAULT_BUSY_TIMEOUT).unwrap();
        let state = SQLiteAppState::new(conn, "test-secret");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    async fn register_and_get_token(server: &TestServer, email: &str) -> String {
        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({"email": email, "password": "hunter22"}))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["data"]["token"].as_str().unwrap().to_owned()
    }

    async fn create_category(server: &TestServer, token: &str, name: &str) -> i64 {
        let response = server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({"name": name}))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_transaction(
        server: &TestServer,
        token: &str,
        category_id: i64,
        amount: f64,
        is_income: bool,
    ) -> i64 {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({
                "is_income": is_income,
                "amount": amount,
                "category_id": category_id,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn create_transaction_succeeds_with_small_positive_amount() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({
                "is_income": false,
                "amount": 0.01,
                "category_id": category_id,
                "note": "gum",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "transaction added successfully");
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
        assert_eq!(body["data"]["amount"], 0.01);
        assert_eq!(body["data"]["note"], "gum");
        assert!(body["data"]["created_at"].is_string());
    }

    #[tokio::test]
    async fn create_transaction_fails_on_non_positive_amount() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;

        for amount in [0.0, -1.0] {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .add_header("Authorization", format!("Bearer {token}"))
                .json(&json!({
                    "is_income": false,
                    "amount": amount,
                    "category_id": category_id,
                }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response
                .assert_json_contains(&json!({"message": "amount must be greater than 0"}));
        }
    }

    #[tokio::test]
    async fn create_transaction_fails_on_foreign_category() {
        let server = get_test_server();
        let alice_token = register_and_get_token(&server, "alice@example.com").await;
        let bob_token = register_and_get_token(&server, "bob@example.com").await;
        let bobs_category = create_category(&server, &bob_token, "Groceries").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {alice_token}"))
            .json(&json!({
                "is_income": false,
                "amount": 5.0,
                "category_id": bobs_category,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json_contains(
            &json!({"message": "category does not exist or access denied"}),
        );
    }

    #[tokio::test]
    async fn transactions_require_authorization() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json_contains(&json!({"message": "authorization header required"}));
    }

    #[tokio::test]
    async fn list_transactions_requires_limit() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json_contains(&json!({"message": "limit must be a positive number"}));
    }

    #[tokio::test]
    async fn list_transactions_returns_newest_first() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;

        let first = create_transaction(&server, &token, category_id, 1.0, false).await;
        let second = create_transaction(&server, &token, category_id, 2.0, false).await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .await;

        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "transactions listed successfully");

        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn list_transactions_pages_are_one_indexed() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;

        for n in 1..=3 {
            create_transaction(&server, &token, category_id, n as f64, false).await;
        }

        async fn rows_on_page(server: &TestServer, token: &str, offset: &str) -> usize {
            let response = server
                .get(endpoints::TRANSACTIONS)
                .add_header("Authorization", format!("Bearer {token}"))
                .add_query_param("limit", "2")
                .add_query_param("offset", offset)
                .await;

            response.assert_status_ok();
            let body: serde_json::Value = response.json();
            body["data"].as_array().unwrap().len()
        }

        // Page zero and page one are the same page.
        assert_eq!(rows_on_page(&server, &token, "0").await, 2);
        assert_eq!(rows_on_page(&server, &token, "1").await, 2);
        // Page two holds the single remaining row.
        assert_eq!(rows_on_page(&server, &token, "2").await, 1);
    }

    #[tokio::test]
    async fn list_transactions_rejects_negative_offset() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .add_query_param("offset", "-1")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response
            .assert_json_contains(&json!({"message": "offset must be a non-negative number"}));
    }

    #[tokio::test]
    async fn list_transactions_rejects_overflowing_page() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", i64::MAX.to_string())
            .add_query_param("offset", i64::MAX.to_string())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response
            .assert_json_contains(&json!({"message": "offset must be a non-negative number"}));
    }

    #[tokio::test]
    async fn list_transactions_filters_by_type() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;

        create_transaction(&server, &token, category_id, 10.0, false).await;
        let wage = create_transaction(&server, &token, category_id, 100.0, true).await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .add_query_param("type", "true")
            .await;

        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![wage]);
    }

    #[tokio::test]
    async fn list_transactions_accepts_one_sided_date_filters() {
        use time::{Duration, OffsetDateTime, macros::format_description};

        fn day(days_from_today: i64) -> String {
            let date = OffsetDateTime::now_utc().date() + Duration::days(days_from_today);

            date.format(format_description!("[year]-[month]-[day]"))
                .unwrap()
        }

        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;
        let id = create_transaction(&server, &token, category_id, 12.5, false).await;

        let from_only = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .add_query_param("from", day(-1))
            .await;

        from_only.assert_status_ok();

        let body: serde_json::Value = from_only.json();
        assert_eq!(body["message"], "transactions listed successfully");
        assert_eq!(body["data"][0]["id"].as_i64().unwrap(), id);

        let to_only = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .add_query_param("to", day(-1))
            .await;

        to_only.assert_status_ok();
        to_only.assert_json_contains(&json!({"message": "no transactions found", "data": []}));
    }

    #[tokio::test]
    async fn list_transactions_rejects_invalid_type() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .add_query_param("type", "income")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json_contains(&json!({"message": "type must be 'true' or 'false'"}));
    }

    #[tokio::test]
    async fn list_transactions_reports_empty_result() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("limit", "10")
            .await;

        response.assert_status_ok();
        response.assert_json_contains(&json!({"message": "no transactions found", "data": []}));
    }

    #[tokio::test]
    async fn get_transaction_by_id_succeeds_for_owner() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;
        let id = create_transaction(&server, &token, category_id, 12.5, false).await;

        let response = server
            .get(endpoints::TRANSACTION)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("id", id.to_string())
            .await;

        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "transaction retrieved successfully");
        assert_eq!(body["data"]["id"].as_i64().unwrap(), id);
    }

    #[tokio::test]
    async fn get_transaction_rejects_empty_id() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::TRANSACTION)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("id", "")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json_contains(&json!({"message": "id cannot be empty"}));
    }

    #[tokio::test]
    async fn get_transaction_rejects_non_positive_ids() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        for id in ["abc", "0", "-3", "1.5"] {
            let response = server
                .get(endpoints::TRANSACTION)
                .add_header("Authorization", format!("Bearer {token}"))
                .add_query_param("id", id)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({"message": "id must be a positive number"}));
        }
    }

    #[tokio::test]
    async fn get_transaction_of_other_user_is_not_found() {
        let server = get_test_server();
        let alice_token = register_and_get_token(&server, "alice@example.com").await;
        let bob_token = register_and_get_token(&server, "bob@example.com").await;
        let bobs_category = create_category(&server, &bob_token, "Groceries").await;
        let bobs_transaction =
            create_transaction(&server, &bob_token, bobs_category, 12.5, false).await;

        let response = server
            .get(endpoints::TRANSACTION)
            .add_header("Authorization", format!("Bearer {alice_token}"))
            .add_query_param("id", bobs_transaction.to_string())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json_contains(&json!({"message": "transaction not found"}));
    }

    #[tokio::test]
    async fn delete_transaction_succeeds_once() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let category_id = create_category(&server, &token, "Groceries").await;
        let id = create_transaction(&server, &token, category_id, 12.5, false).await;

        let first_delete = server
            .delete(endpoints::TRANSACTION)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("id", id.to_string())
            .await;

        first_delete.assert_status_ok();
        first_delete
            .assert_json_contains(&json!({"message": "transaction deleted successfully"}));

        let second_delete = server
            .delete(endpoints::TRANSACTION)
            .add_header("Authorization", format!("Bearer {token}"))
            .add_query_param("id", id.to_string())
            .await;

        second_delete.assert_status(StatusCode::NOT_FOUND);
        second_delete.assert_json_contains(&json!({"message": "transaction not found"}));
    }
}
