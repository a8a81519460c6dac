//! Defines the endpoint for updating an account
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountId, create_endpoint::validate_account_name, get_account},
    app_state::lock_connection,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields of an account that may be changed directly.
///
/// The balance is deliberately absent: it only changes through transactions,
/// and a request that tries to set it is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditAccountForm {
    /// The new display name, if it should change.
    pub name: Option<String>,
}

/// A route handler for updating an account, responds with the updated account.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<EditAccountForm>, Error>,
) -> Result<Json<Account>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_account(account_id, &form, &connection)
        .map(Json)
        .inspect_err(|error| {
            tracing::debug!("Could not update account {account_id}: {error}");
        })
}

/// Apply the changes in `form` to the account `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the new name is blank,
/// - [Error::AccountNotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    form: &EditAccountForm,
    connection: &Connection,
) -> Result<Account, Error> {
    let Some(name) = form.name.as_deref() else {
        return get_account(id, connection);
    };

    let name = validate_account_name(Some(name))?;

    let rows_affected = connection.execute(
        "UPDATE account SET name = ?1 WHERE id = ?2",
        params![name, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::AccountNotFound);
    }

    get_account(id, connection)
}
