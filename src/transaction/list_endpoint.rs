//! Defines the endpoints for reading transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    transaction::{Transaction, TransactionId, get_transaction, list_transactions},
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every transaction, most recent first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_transactions(&connection).map(Json)
}

/// A route handler that responds with a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<ListTransactionsState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<TransactionId>, Error>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection).map(Json)
}
