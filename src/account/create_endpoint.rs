//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, insert_account},
    app_state::lock_connection,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating an account.
///
/// New accounts always start with a zero balance, so a `balance` field is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountForm {
    /// The display name of the account.
    pub name: Option<String>,
}

/// A route handler for creating a new account, responds with the new account.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    WithRejection(Json(form), _): WithRejection<Json<AccountForm>, Error>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(&form, &connection).inspect_err(|error| {
        tracing::debug!("Could not create account with {form:?}: {error}");
    })?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Create an account with a zero balance.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the name is missing or blank,
/// - or [Error::SqlError] if there is an SQL error.
pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    let name = validate_account_name(form.name.as_deref())?;

    insert_account(name, connection)
}

pub(super) fn validate_account_name(name: Option<&str>) -> Result<&str, Error> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::Validation("Account name cannot be empty".to_owned())),
    }
}
