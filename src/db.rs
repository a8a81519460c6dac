//! Database setup and helpers for reading values that SQLite has no native type for.

use std::str::FromStr;

use rusqlite::{Connection, Row, TransactionBehavior, types::Type};
use rust_decimal::Decimal;

use crate::{Error, account::create_account_table, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a decimal stored as text from column `index` of `row`.
///
/// Decimals are stored as text rather than `REAL` so that balances never pick
/// up binary floating point error.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

/// Read a value stored as text from column `index` of `row` and parse it with [FromStr].
pub(crate) fn get_parsed<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = Error>,
{
    let text: String = row.get(index)?;

    text.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use super::{get_decimal, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn reads_decimal_text_exactly() {
        let connection = Connection::open_in_memory().unwrap();

        let value = connection
            .query_row("SELECT '0.1'", [], |row| get_decimal(row, 0))
            .unwrap();

        assert_eq!(value, dec!(0.1));
    }

    #[test]
    fn rejects_non_decimal_text() {
        let connection = Connection::open_in_memory().unwrap();

        let result = connection.query_row("SELECT 'abc'", [], |row| get_decimal(row, 0));

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))
        ));
    }
}
