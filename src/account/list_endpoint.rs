//! Defines the endpoint for listing all accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, list_accounts},
    app_state::lock_connection,
};

/// The state needed to list accounts.
#[derive(Debug, Clone)]
pub struct ListAccountsState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every account as JSON.
pub async fn list_accounts_endpoint(
    State(state): State<ListAccountsState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_accounts(&connection).map(Json)
}
