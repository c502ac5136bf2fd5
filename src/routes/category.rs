//! The handlers for creating and listing transaction categories.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    Error,
    auth::AuthenticatedUser,
    models::CategoryName,
    routes::{invalid_json, json_response},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data submitted when creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryForm {
    /// The name of the category. Must not be empty.
    pub name: String,
    /// An optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Handler for creating a new category for the calling user.
///
/// # Errors
///
/// Returns a 400 if the name is empty and a 409 if the caller already has a
/// category with that name.
pub async fn create_category<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let Json(form) = payload.map_err(|_| invalid_json())?;

    let name = CategoryName::new(&form.name)?;

    let category = state
        .category_store
        .create(user.user_id, name, form.description)?;

    Ok(json_response(
        StatusCode::CREATED,
        "category added successfully",
        Some(category),
    ))
}

/// Handler for listing all of the calling user's categories.
pub async fn list_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let categories = state.category_store.get_by_user(user.user_id)?;

    Ok(json_response(
        StatusCode::OK,
        "categories listed successfully",
        Some(categories),
    ))
}

#[cfg(test)]
mod category_route_tests {
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

    #[tokio::test]
    async fn create_category_succeeds() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({"name": "Groceries", "description": "food and such"}))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "category added successfully");
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
        assert_eq!(body["data"]["name"], "Groceries");
        assert_eq!(body["data"]["description"], "food and such");
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({"name": "  "}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json_contains(&json!({"message": "category name cannot be empty"}));
    }

    #[tokio::test]
    async fn create_category_fails_on_duplicate_name() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;
        let form = json!({"name": "Groceries"});

        server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&form)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&form)
            .await;

        response.assert_status(StatusCode::CONFLICT);
        response.assert_json_contains(&json!({"message": "category already exists"}));
    }

    #[tokio::test]
    async fn list_categories_is_scoped_to_the_caller() {
        let server = get_test_server();
        let alice_token = register_and_get_token(&server, "alice@example.com").await;
        let bob_token = register_and_get_token(&server, "bob@example.com").await;

        server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {alice_token}"))
            .json(&json!({"name": "Groceries"}))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {bob_token}"))
            .json(&json!({"name": "Travel"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {alice_token}"))
            .await;

        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "categories listed successfully");

        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|category| category["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Groceries"]);
    }

    #[tokio::test]
    async fn list_categories_returns_empty_list() {
        let server = get_test_server();
        let token = register_and_get_token(&server, "alice@example.com").await;

        let response = server
            .get(endpoints::CATEGORIES)
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_ok();
        response.assert_json_contains(&json!({"data": []}));
    }
}
