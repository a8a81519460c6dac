//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    balance::{Direction, apply_delta},
    transaction::{Transaction, TransactionId, delete_transaction_row, get_transaction},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<TransactionId>, Error>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::debug!("Could not delete transaction {transaction_id}: {error}");
    })?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

/// Remove the transaction `id` and reverse its impact on its account's balance.
///
/// If the account no longer exists the deletion fails and the transaction is
/// kept, so the balance and the transaction list never disagree.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - [Error::AccountNotFound] if the transaction's account does not exist,
/// - [Error::BalanceOverflow] if the reversed balance would not fit in a decimal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let db_transaction = connection.unchecked_transaction()?;

    let transaction = get_transaction(id, &db_transaction)?;

    apply_delta(
        transaction.account_id,
        transaction.transaction_type,
        transaction.amount,
        Direction::Reverse,
        &db_transaction,
    )?;

    if delete_transaction_row(id, &db_transaction)? == 0 {
        return Err(Error::TransactionNotFound);
    }

    db_transaction.commit()?;

    tracing::info!("Deleted transaction {id}");

    Ok(transaction)
}
