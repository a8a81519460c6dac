//! Defines the endpoint for updating a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::get_account,
    app_state::lock_connection,
    balance::{Direction, apply_delta},
    transaction::{
        Transaction, TransactionChanges, TransactionFields, TransactionId, get_transaction,
        write_transaction,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a transaction, responds with the updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    WithRejection(Path(transaction_id), _): WithRejection<Path<TransactionId>, Error>,
    WithRejection(Json(fields), _): WithRejection<Json<TransactionFields>, Error>,
) -> Result<Json<Transaction>, Error> {
    let changes = TransactionChanges::from_fields(fields)?;

    let connection = lock_connection(&state.db_connection)?;

    update_transaction(transaction_id, &changes, &connection)
        .map(Json)
        .inspect_err(|error| {
            tracing::debug!("Could not update transaction {transaction_id}: {error}");
        })
}

/// Apply `changes` to the transaction `id` and move its balance impact.
///
/// The original transaction's delta is reversed on its original account, then
/// the updated transaction's delta is applied to its (possibly different)
/// account. All writes share one database transaction, so on any error the
/// transaction and every balance are left as they were.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - [Error::AccountNotFound] if the original or the new account does not exist,
/// - [Error::BalanceOverflow] if a balance would not fit in a decimal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: &TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let db_transaction = connection.unchecked_transaction()?;

    let original = get_transaction(id, &db_transaction)?;

    apply_delta(
        original.account_id,
        original.transaction_type,
        original.amount,
        Direction::Reverse,
        &db_transaction,
    )?;

    let updated = changes.apply_to(&original);

    get_account(updated.account_id, &db_transaction)?;

    if write_transaction(&updated, &db_transaction)? == 0 {
        return Err(Error::TransactionNotFound);
    }

    apply_delta(
        updated.account_id,
        updated.transaction_type,
        updated.amount,
        Direction::Apply,
        &db_transaction,
    )?;

    db_transaction.commit()?;

    Ok(updated)
}
