//! The route paths served by the app.
//!
//! For paths that take a parameter, e.g., '/api/accounts/{account_id}', use [format_endpoint].

/// The dashboard page.
pub const ROOT: &str = "/";

/// The route to list and create accounts.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route that creates the default accounts when there are none.
pub const SEED_ACCOUNTS: &str = "/api/accounts/setup";
/// The route to update a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to read, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a name wrapped in braces, e.g., '{account_id}' in
/// '/api/accounts/{account_id}'. If there is no parameter, `endpoint_path`
/// is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::ACCOUNTS_API,
            endpoints::SEED_ACCOUNTS,
            endpoints::ACCOUNT,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
        ] {
            assert!(endpoint.parse::<Uri>().is_ok(), "{endpoint} is not a valid URI");
        }
    }

    #[test]
    fn replaces_parameter_with_id() {
        assert_eq!(format_endpoint(endpoints::ACCOUNT, 3), "/api/accounts/3");
        assert_eq!(
            format_endpoint(endpoints::TRANSACTION, 12),
            "/api/transactions/12"
        );
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint("/api/accounts", 1), "/api/accounts");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
