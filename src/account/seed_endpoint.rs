//! Defines the endpoint that creates the default accounts on first use.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, insert_account, list_accounts},
    app_state::lock_connection,
};

/// The accounts created by [seed_accounts] when there are no accounts.
pub const DEFAULT_ACCOUNT_NAMES: [&str; 2] = ["Cash Wallet", "Bank Account"];

/// The state needed to seed the default accounts.
#[derive(Debug, Clone)]
pub struct SeedAccountsState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SeedAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that seeds the default accounts, responds with all accounts.
pub async fn seed_accounts_endpoint(
    State(state): State<SeedAccountsState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    seed_accounts(&connection).map(Json)
}

/// Create the [default accounts](DEFAULT_ACCOUNT_NAMES) with zero balances if
/// no accounts exist, otherwise do nothing.
///
/// Returns every account either way.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn seed_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let account_count: i64 =
        transaction.query_row("SELECT COUNT(id) FROM account", [], |row| row.get(0))?;

    if account_count == 0 {
        for name in DEFAULT_ACCOUNT_NAMES {
            insert_account(name, &transaction)?;
        }

        tracing::info!("Created the default accounts {DEFAULT_ACCOUNT_NAMES:?}");
    }

    let accounts = list_accounts(&transaction)?;
    transaction.commit()?;

    Ok(accounts)
}
