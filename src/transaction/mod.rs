//! Transactions and the operations that keep account balances in step with them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions for storing it
//! - Parsing and validation of client supplied fields
//! - The create, read, update and delete operations and their route handlers

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod fields;
mod list_endpoint;

pub use self::core::{
    NewTransaction, Transaction, TransactionId, TransactionType, create_transaction_table,
    delete_transaction_row, get_transaction, insert_transaction, list_transactions,
    map_transaction_row, write_transaction,
};
pub use create_endpoint::{create_transaction, create_transaction_endpoint};
pub use delete_endpoint::{delete_transaction, delete_transaction_endpoint};
pub use edit_endpoint::{edit_transaction_endpoint, update_transaction};
pub use fields::{TransactionChanges, TransactionFields};
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};

#[cfg(test)]
pub use self::core::count_transactions;
