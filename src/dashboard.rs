//! The dashboard page: account balances, their total and the transaction history.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::extract::{FromRef, State};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_total_account_balance, list_accounts},
    app_state::lock_connection,
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    transaction::{Transaction, TransactionType, list_transactions},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the accounts, their total balance and every transaction.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Markup, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let accounts = list_accounts(&connection)?;
    let total_balance = get_total_account_balance(&connection)?;
    let transactions = list_transactions(&connection)?;

    Ok(dashboard_view(&accounts, total_balance, &transactions))
}

fn dashboard_view(
    accounts: &[Account],
    total_balance: Decimal,
    transactions: &[Transaction],
) -> Markup {
    let account_names: HashMap<AccountId, &str> = accounts
        .iter()
        .map(|account| (account.id, account.name.as_str()))
        .collect();

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Finance Tracker" }

            section id="accounts" class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full max-w-5xl"
            {
                @for account in accounts
                {
                    div class=(CARD_STYLE) data-account-id=(account.id)
                    {
                        h2 class="text-sm text-gray-500 dark:text-gray-400" { (account.name) }
                        p class="account-balance text-2xl font-semibold"
                        {
                            (format_currency(account.balance))
                        }
                    }
                }

                div id="total-balance" class=(CARD_STYLE)
                {
                    h2 class="text-sm text-gray-500 dark:text-gray-400" { "Total" }
                    p class="text-2xl font-semibold" { (format_currency(total_balance)) }
                }
            }

            section id="transactions" class="w-full max-w-5xl mt-8 overflow-x-auto"
            {
                h2 class="text-lg font-bold mb-2" { "Transactions" }

                @if transactions.is_empty()
                {
                    p { "No transactions yet." }
                }
                @else
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions
                            {
                                (transaction_row(transaction, &account_names))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &content)
}

fn transaction_row(
    transaction: &Transaction,
    account_names: &HashMap<AccountId, &str>,
) -> Markup {
    let date = transaction
        .date
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| transaction.date.to_string());
    let account_name = account_names
        .get(&transaction.account_id)
        .copied()
        .unwrap_or("Unknown account");
    let (amount, amount_style) = match transaction.transaction_type {
        TransactionType::Income => (format_currency(transaction.amount), "text-green-600"),
        TransactionType::Expense => (format_currency(-transaction.amount), "text-red-600"),
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(date) { (date) } }
            td class=(TABLE_CELL_STYLE) { (account_name) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (transaction.note.as_deref().unwrap_or_default()) }
            td class={"px-6 py-4 text-right " (amount_style)} { (amount) }
        }
    )
}
