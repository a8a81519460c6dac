//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    account::{
        create_account_endpoint, edit_account_endpoint, list_accounts_endpoint,
        seed_accounts_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Any origin may call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(
            endpoints::ACCOUNTS_API,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(endpoints::SEED_ACCOUNTS, post(seed_accounts_endpoint))
        .route(endpoints::ACCOUNT, put(edit_account_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
