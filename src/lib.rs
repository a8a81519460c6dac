//! Finance Tracker is a web app for recording income and expenses against a
//! small set of accounts.
//!
//! This library provides a JSON API for accounts and transactions and a
//! server rendered dashboard page. The interesting part is the balance engine
//! in [balance], which keeps every account's stored balance equal to the
//! signed sum of the transactions that reference it.
//!
//! Each write operation on transactions touches two records (the transaction
//! and one or two account balances). These writes are grouped into a single
//! SQLite transaction, so a failure part way through leaves both records as
//! they were before the request.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod balance;
mod dashboard;
mod db;
pub mod endpoints;
mod html;
mod logging;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId};
pub use app_state::AppState;
pub use balance::{Direction, apply_delta, signed_delta};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionId, TransactionType};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("could not install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request with a missing or malformed field.
    ///
    /// The message is shown to the client as is, so it should describe which
    /// precondition failed without leaking internal details.
    #[error("{0}")]
    Validation(String),

    /// Applying a transaction would push an account balance outside the range
    /// of the decimal type.
    #[error("the transaction amount would overflow the account balance")]
    BalanceOverflow,

    /// The account referenced by a request does not exist.
    #[error("Account not found")]
    AccountNotFound,

    /// The transaction referenced by a request does not exist.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A value read from the database could not be interpreted.
    ///
    /// This indicates the stored data was modified outside of the app.
    #[error("invalid value in the database: {0}")]
    InvalidStoredValue(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::BalanceOverflow => StatusCode::BAD_REQUEST,
            Error::AccountNotFound | Error::TransactionNotFound | Error::NotFound => {
                StatusCode::NOT_FOUND
            }
            Error::InvalidStoredValue(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
