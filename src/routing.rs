//! Assigns the request handlers to routes and layers the authorization
//! middleware over the protected subset.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};

use crate::{
    auth::{AuthState, auth_guard},
    endpoints,
    routes::{
        category::{create_category, list_categories},
        log_in::log_in,
        register::register,
        summary::get_summary,
        transaction::{create_transaction, delete_transaction, get_transaction, list_transactions},
    },
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// Create the app's router.
///
/// Every route except register and login sits behind the bearer token guard.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let auth_state = AuthState::from_ref(&state);

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction::<C, T, U>).get(list_transactions::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction::<C, T, U>).delete(delete_transaction::<C, T, U>),
        )
        .route(
            endpoints::CATEGORIES,
            post(create_category::<C, T, U>).get(list_categories::<C, T, U>),
        )
        .route(endpoints::SUMMARY, get(get_summary::<C, T, U>))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard));

    let public_routes = Router::new()
        .route(endpoints::REGISTER, post(register::<C, T, U>))
        .route(endpoints::LOG_IN, post(log_in::<C, T, U>));

    public_routes.merge(protected_routes).with_state(state)
}
