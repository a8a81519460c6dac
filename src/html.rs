//! Shared page layout, styles and formatting for server rendered HTML.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, prelude::ToPrimitive};

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Card style for the account summaries
pub const CARD_STYLE: &str = "p-4 bg-white rounded-lg shadow dark:bg-gray-800 \
    border border-gray-200 dark:border-gray-700";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Wrap `content` in the HTML document shared by every page.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Tracker" }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Format `amount` as dollars with two decimal places, e.g. "-$1,234.50".
pub fn format_currency(amount: Decimal) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let amount = amount.round_dp(2);

    if amount.is_zero() {
        // numfmt renders zero as "0"
        return "$0.00".to_owned();
    }

    let (cell, prefix) = if amount.is_sign_negative() {
        (&NEGATIVE_FMT, "-$")
    } else {
        (&POSITIVE_FMT, "$")
    };

    let formatter = cell.get_or_init(|| {
        Formatter::currency(prefix)
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let magnitude = amount.abs();
    let formatted = match (formatter, magnitude.to_f64()) {
        (Some(formatter), Some(value)) => formatter.fmt_string(value),
        _ => return format!("{prefix}{magnitude:.2}"),
    };

    pad_cents(formatted)
}

/// numfmt drops trailing zeros, e.g. "$12.30" is rendered as "$12.3".
fn pad_cents(formatted: String) -> String {
    match formatted.rfind('.') {
        None => format!("{formatted}.00"),
        Some(point) if formatted.len() - point == 2 => format!("{formatted}0"),
        Some(_) => formatted,
    }
}
