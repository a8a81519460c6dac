//! Accounts hold a balance that is kept in sync with their transactions.
//!
//! Accounts can be listed, created, renamed and seeded with the two default
//! accounts. Balances are never edited directly through this module's
//! endpoints, only through the [balance engine](crate::balance).

mod core;
mod create_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod seed_endpoint;

pub use self::core::{
    Account, AccountId, create_account_table, get_account, get_total_account_balance,
    insert_account, list_accounts, map_row_to_account,
};
pub(crate) use self::core::set_account_balance;
pub use create_endpoint::{create_account, create_account_endpoint};
pub use edit_endpoint::{edit_account_endpoint, update_account};
pub use list_endpoint::list_accounts_endpoint;
pub use seed_endpoint::{DEFAULT_ACCOUNT_NAMES, seed_accounts, seed_accounts_endpoint};
