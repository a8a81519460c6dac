//! Defines the account model and the database queries for accounts.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Error, db::get_decimal};

/// The integer type used for account IDs.
pub type AccountId = i64;

/// A place money is kept, e.g. a wallet or a bank account.
///
/// The balance is only changed by the [balance engine](crate::balance) when
/// transactions are created, edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The signed sum of the transactions that reference this account.
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            balance TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = get_decimal(row, 2)?;

    Ok(Account { id, name, balance })
}

/// Insert a new account with a zero balance.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn insert_account(name: &str, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "INSERT INTO account (name, balance) VALUES (?1, ?2)
             RETURNING id, name, balance",
        )?
        .query_row(params![name, Decimal::ZERO.to_string()], map_row_to_account)?;

    Ok(account)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, name, balance FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::AccountNotFound,
            error => error,
        })
}

/// Get all accounts in the order they are stored.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance FROM account ORDER BY id")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Overwrite the stored balance of the account `id`.
///
/// Only the [balance engine](crate::balance::apply_delta) should call this.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub(crate) fn set_account_balance(
    id: AccountId,
    balance: Decimal,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "UPDATE account SET balance = ?1 WHERE id = ?2
             RETURNING id, name, balance",
        )?
        .query_row(params![balance.to_string(), id], map_row_to_account)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::AccountNotFound,
            error => error,
        })
}

/// Get the total balance across all accounts.
///
/// The total saturates at the decimal bounds instead of overflowing.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_total_account_balance(connection: &Connection) -> Result<Decimal, Error> {
    let total = list_accounts(connection)?
        .iter()
        .fold(Decimal::ZERO, |total, account| total.saturating_add(account.balance));

    Ok(total)
}


#[cfg(test)]
mod account_query_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::{
        create_account_table, get_account, get_total_account_balance, insert_account,
        list_accounts, set_account_balance,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_account_table(&conn).unwrap();
        conn
    }

    #[test]
    fn new_account_starts_at_zero() {
        let conn = get_test_connection();

        let account = insert_account("Cash Wallet", &conn).unwrap();

        assert_eq!(account.name, "Cash Wallet");
        assert_eq!(account.balance, dec!(0));
        assert_eq!(get_account(account.id, &conn), Ok(account));
    }

    #[test]
    fn get_missing_account_fails() {
        let conn = get_test_connection();

        assert_eq!(get_account(42, &conn), Err(Error::AccountNotFound));
    }

    #[test]
    fn set_balance_on_missing_account_fails() {
        let conn = get_test_connection();

        assert_eq!(
            set_account_balance(42, dec!(1), &conn),
            Err(Error::AccountNotFound)
        );
    }

    #[test]
    fn balance_round_trips_without_rounding() {
        let conn = get_test_connection();
        let account = insert_account("Bank Account", &conn).unwrap();

        let updated = set_account_balance(account.id, dec!(1234567.89), &conn).unwrap();

        assert_eq!(updated.balance, dec!(1234567.89));
        assert_eq!(get_account(account.id, &conn).unwrap().balance, dec!(1234567.89));
    }

    #[test]
    fn balance_serializes_without_losing_precision() {
        let conn = get_test_connection();
        let account = insert_account("Bank Account", &conn).unwrap();
        set_account_balance(account.id, dec!(-1234567890123456789.01), &conn).unwrap();

        let json = serde_json::to_value(get_account(account.id, &conn).unwrap()).unwrap();

        assert_eq!(json["balance"], "-1234567890123456789.01");
    }

    #[test]
    fn lists_accounts_in_insertion_order() {
        let conn = get_test_connection();
        let first = insert_account("First", &conn).unwrap();
        let second = insert_account("Second", &conn).unwrap();

        assert_eq!(list_accounts(&conn), Ok(vec![first, second]));
    }

    #[test]
    fn total_balance_sums_all_accounts() {
        let conn = get_test_connection();
        let first = insert_account("First", &conn).unwrap();
        let second = insert_account("Second", &conn).unwrap();
        set_account_balance(first.id, dec!(100.50), &conn).unwrap();
        set_account_balance(second.id, dec!(-50.25), &conn).unwrap();

        assert_eq!(get_total_account_balance(&conn), Ok(dec!(50.25)));
    }

    #[test]
    fn total_balance_saturates_at_decimal_max() {
        let conn = get_test_connection();
        let first = insert_account("First", &conn).unwrap();
        let second = insert_account("Second", &conn).unwrap();
        set_account_balance(first.id, Decimal::MAX, &conn).unwrap();
        set_account_balance(second.id, Decimal::MAX, &conn).unwrap();

        assert_eq!(get_total_account_balance(&conn), Ok(Decimal::MAX));
    }

    #[test]
    fn total_balance_is_zero_without_accounts() {
        let conn = get_test_connection();

        assert_eq!(get_total_account_balance(&conn), Ok(dec!(0)));
    }
}
