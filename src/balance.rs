//! The balance engine keeps each account's stored balance equal to the signed
//! sum of its transactions.
//!
//! The engine is strictly incremental: creating a transaction applies its
//! delta, deleting one reverses it, and editing one reverses the original
//! delta before applying the new one. There is no path that recomputes a
//! balance from scratch, so callers must pair every reversal with the values
//! that were originally applied.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    account::{Account, AccountId, get_account, set_account_balance},
    transaction::TransactionType,
};

/// Whether to add a transaction's impact to a balance or take it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Add the transaction's delta to the balance.
    Apply,
    /// Undo a previously applied delta by adding its negation.
    Reverse,
}

/// Compute the amount a transaction changes its account's balance by.
///
/// Income adds `amount` and expenses subtract it. Reversing negates the result.
pub fn signed_delta(
    transaction_type: TransactionType,
    amount: Decimal,
    direction: Direction,
) -> Decimal {
    let signed = match transaction_type {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    };

    match direction {
        Direction::Apply => signed,
        Direction::Reverse => -signed,
    }
}

/// Apply (or reverse) the impact of a transaction on the balance of the
/// account `account_id` and persist the new balance.
///
/// The account is read from the database on every call rather than trusting
/// a copy held by the caller, so two calls against the same account within
/// one operation (e.g., editing a transaction without changing its account)
/// see each other's writes.
///
/// Exactly one write is made to the account per successful call.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountNotFound] if the account does not exist at call time,
/// - [Error::BalanceOverflow] if the new balance does not fit in a decimal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn apply_delta(
    account_id: AccountId,
    transaction_type: TransactionType,
    amount: Decimal,
    direction: Direction,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = get_account(account_id, connection)?;
    let delta = signed_delta(transaction_type, amount, direction);

    let balance = account
        .balance
        .checked_add(delta)
        .ok_or(Error::BalanceOverflow)?;

    tracing::debug!(
        "{direction:?} {transaction_type} of {amount} on account {account_id}: {} -> {balance}",
        account.balance
    );

    set_account_balance(account.id, balance, connection)
}
