//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    account::AccountId,
    db::{get_decimal, get_parsed},
};

// ============================================================================
// MODELS
// ============================================================================

/// The integer type used for transaction IDs.
pub type TransactionId = i64;

/// Whether a transaction adds money to or takes money from its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, increases the account balance.
    Income,
    /// Money spent, decreases the account balance.
    Expense,
}

impl TransactionType {
    /// The name used for this type in requests, responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::Validation(
                "Type must be 'income' or 'expense'".to_owned(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive, the sign is implied by [TransactionType].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the money moved in or out of.
    #[serde(rename = "account")]
    pub account_id: AccountId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, always greater than zero.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// What the money was spent on or earned from, e.g. "Groceries".
    pub category: String,
    /// Free text detailing the transaction.
    pub note: Option<String>,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// A validated transaction that has not been stored yet.
///
/// Use [NewTransaction::from_fields] to build one from a request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money, greater than zero.
    pub amount: Decimal,
    /// A non-empty category name.
    pub category: String,
    /// Optional free text.
    pub note: Option<String>,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// There is no foreign key on `account_id`: the balance engine checks the
/// account exists whenever it touches a transaction.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                note TEXT,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let transaction_type = get_parsed(row, 2)?;
    let amount = get_decimal(row, 3)?;
    let category = row.get(4)?;
    let note = row.get(5)?;
    let date = row.get(6)?;

    Ok(Transaction {
        id,
        account_id,
        transaction_type,
        amount,
        category,
        note,
        date,
    })
}

/// Insert a new transaction row.
///
/// This does not touch the account balance, see
/// [create_transaction](crate::transaction::create_transaction) for that.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn insert_transaction(
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (account_id, type, amount, category, note, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, account_id, type, amount, category, note, date",
        )?
        .query_row(
            params![
                new_transaction.account_id,
                new_transaction.transaction_type.as_str(),
                new_transaction.amount.to_string(),
                new_transaction.category,
                new_transaction.note,
                new_transaction.date.to_offset(UtcOffset::UTC),
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, account_id, type, amount, category, note, date
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::TransactionNotFound,
            error => error,
        })
}

/// Get all transactions, most recent first.
///
/// Transactions on the same date are ordered newest ID first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, type, amount, category, note, date
             FROM \"transaction\" ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Overwrite every field of the stored transaction with the same ID as `transaction`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn write_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\"
        SET \
            account_id = ?1, \
            type = ?2, \
            amount = ?3, \
            category = ?4, \
            note = ?5, \
            date = ?6 \
        WHERE id = ?7;",
            params![
                transaction.account_id,
                transaction.transaction_type.as_str(),
                transaction.amount.to_string(),
                transaction.category,
                transaction.note,
                transaction.date.to_offset(UtcOffset::UTC),
                transaction.id,
            ],
        )
        .map_err(Error::from)
}

/// Remove the transaction row `id`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction_row(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(Error::from)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use crate::{Error, transaction::TransactionType};

    #[test]
    fn parses_known_types() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn rejects_unknown_type() {
        for text in ["transfer", "Income", ""] {
            assert!(matches!(
                text.parse::<TransactionType>(),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_value(TransactionType::Expense).unwrap(),
            serde_json::json!("expense")
        );
    }
}
