//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    account::get_account,
    app_state::lock_connection,
    balance::{Direction, apply_delta},
    transaction::{NewTransaction, Transaction, TransactionFields, insert_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    WithRejection(Json(fields), _): WithRejection<Json<TransactionFields>, Error>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let new_transaction = NewTransaction::from_fields(fields, OffsetDateTime::now_utc())?;

    let connection = lock_connection(&state.db_connection)?;

    let transaction = create_transaction(&new_transaction, &connection).inspect_err(|error| {
        tracing::debug!("Could not create transaction {new_transaction:?}: {error}");
    })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Store `new_transaction` and apply it to its account's balance.
///
/// Both writes happen in one database transaction: if either fails, neither
/// the transaction nor the balance is changed.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if the account does not exist,
/// - [Error::BalanceOverflow] if the new balance would not fit in a decimal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let db_transaction = connection.unchecked_transaction()?;

    get_account(new_transaction.account_id, &db_transaction)?;

    let transaction = insert_transaction(new_transaction, &db_transaction)?;
    apply_delta(
        transaction.account_id,
        transaction.transaction_type,
        transaction.amount,
        Direction::Apply,
        &db_transaction,
    )?;

    db_transaction.commit()?;

    tracing::info!(
        "Recorded {} {} of {} on account {}",
        transaction.transaction_type,
        transaction.id,
        transaction.amount,
        transaction.account_id
    );

    Ok(transaction)
}
