//! Parsing and validation of the transaction fields sent by clients.
//!
//! Request bodies are deserialized into [TransactionFields] with every field
//! optional, then validated into either a [NewTransaction] or a set of
//! [TransactionChanges]. Validation never touches the database, so a request
//! that fails here has not changed anything.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use time::{
    Date, OffsetDateTime, Time, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    account::AccountId,
    transaction::{NewTransaction, Transaction, TransactionType},
};

/// A field in a partial update.
///
/// A key missing from the JSON object is [Patch::Absent], an explicit `null`
/// is [Patch::Clear] and any other value is [Patch::Set].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// The field was not sent, keep the current value.
    Absent,
    /// The field was sent as `null`, remove the current value.
    Clear,
    /// The field was sent with a value.
    Set(T),
}

// `T` need not implement `Default`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present, missing keys use `Default`.
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `12.5`
    Number(serde_json::Number),
    /// e.g. `"12.50"`
    Text(String),
}

/// The fields of a transaction as sent in a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFields {
    /// The ID of the account.
    #[serde(default)]
    pub account: Patch<AccountId>,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub transaction_type: Patch<String>,
    /// A positive amount.
    #[serde(default)]
    pub amount: Patch<AmountInput>,
    /// The category name.
    #[serde(default)]
    pub category: Patch<String>,
    /// Free text.
    #[serde(default)]
    pub note: Patch<String>,
    /// An RFC 3339 timestamp or a `YYYY-MM-DD` date.
    #[serde(default)]
    pub date: Patch<String>,
}

const REQUIRED_FIELDS_MESSAGE: &str = "account, type, amount, and category are required";

impl NewTransaction {
    /// Validate the fields for a new transaction.
    ///
    /// `now` is used as the date when no date is given.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if a required field is missing, the
    /// amount is not a positive number, the type is unknown or the date
    /// cannot be parsed.
    pub fn from_fields(fields: TransactionFields, now: OffsetDateTime) -> Result<Self, Error> {
        let (
            Patch::Set(account_id),
            Patch::Set(transaction_type),
            Patch::Set(amount),
            Patch::Set(category),
        ) = (
            fields.account,
            fields.transaction_type,
            fields.amount,
            fields.category,
        )
        else {
            return Err(Error::Validation(REQUIRED_FIELDS_MESSAGE.to_owned()));
        };

        let category = category.trim();
        if transaction_type.is_empty() || category.is_empty() {
            return Err(Error::Validation(REQUIRED_FIELDS_MESSAGE.to_owned()));
        }

        let amount = parse_amount(&amount)?;
        let transaction_type = transaction_type.parse()?;

        let note = match fields.note {
            Patch::Set(note) => Some(note),
            Patch::Absent | Patch::Clear => None,
        };

        let date = match fields.date {
            Patch::Set(date) => parse_date(&date).ok_or_else(|| {
                Error::Validation("Date must be a valid date or timestamp".to_owned())
            })?,
            Patch::Absent | Patch::Clear => now,
        };

        Ok(Self {
            account_id,
            transaction_type,
            amount,
            category: category.to_owned(),
            note,
            date,
        })
    }
}

/// Validated changes to an existing transaction.
///
/// `None` means keep the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// Move the transaction to another account.
    pub account_id: Option<AccountId>,
    /// Change between income and expense.
    pub transaction_type: Option<TransactionType>,
    /// Change the amount.
    pub amount: Option<Decimal>,
    /// Change the category, never blank.
    pub category: Option<String>,
    /// Set, clear or keep the note.
    pub note: Patch<String>,
    /// Change the date.
    pub date: Option<OffsetDateTime>,
}

impl TransactionChanges {
    /// Validate the fields of an update request.
    ///
    /// A blank category and a date that does not parse are ignored rather
    /// than rejected, so the stored values are kept.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the account, type or amount is
    /// `null`, the amount is not a positive number or the type is unknown.
    pub fn from_fields(fields: TransactionFields) -> Result<Self, Error> {
        let account_id = required_patch(fields.account, "account")?;

        let amount = required_patch(fields.amount, "amount")?
            .map(|amount| parse_amount(&amount))
            .transpose()?;

        let transaction_type = required_patch(fields.transaction_type, "type")?
            .map(|transaction_type| transaction_type.parse())
            .transpose()?;

        let category = match fields.category {
            Patch::Set(category) if !category.trim().is_empty() => {
                Some(category.trim().to_owned())
            }
            _ => None,
        };

        let date = match fields.date {
            Patch::Set(date) => {
                let parsed = parse_date(&date);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unparseable transaction date {date:?}");
                }
                parsed
            }
            Patch::Absent | Patch::Clear => None,
        };

        Ok(Self {
            account_id,
            transaction_type,
            amount,
            category,
            note: fields.note,
            date,
        })
    }

    /// Return a copy of `transaction` with these changes applied.
    ///
    /// `transaction` itself is left untouched so the caller can still reverse
    /// its original balance impact.
    pub fn apply_to(&self, transaction: &Transaction) -> Transaction {
        Transaction {
            id: transaction.id,
            account_id: self.account_id.unwrap_or(transaction.account_id),
            transaction_type: self
                .transaction_type
                .unwrap_or(transaction.transaction_type),
            amount: self.amount.unwrap_or(transaction.amount),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| transaction.category.clone()),
            note: match &self.note {
                Patch::Absent => transaction.note.clone(),
                Patch::Clear => None,
                Patch::Set(note) => Some(note.clone()),
            },
            date: self.date.unwrap_or(transaction.date),
        }
    }
}

fn required_patch<T>(patch: Patch<T>, field_name: &str) -> Result<Option<T>, Error> {
    match patch {
        Patch::Absent => Ok(None),
        Patch::Clear => Err(Error::Validation(format!("{field_name} cannot be null"))),
        Patch::Set(value) => Ok(Some(value)),
    }
}

/// Parse an amount, which must be a finite decimal greater than zero.
///
/// # Errors
/// Returns an [Error::Validation] if the amount is not a number or is not positive.
pub fn parse_amount(amount: &AmountInput) -> Result<Decimal, Error> {
    let text = match amount {
        AmountInput::Number(number) => number.to_string(),
        AmountInput::Text(text) => text.trim().to_owned(),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or_else(|| Error::Validation("Amount must be a positive number".to_owned()))
}

/// Parse an RFC 3339 timestamp, or a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.to_offset(UtcOffset::UTC));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
}


#[cfg(test)]
mod parse_tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::Error;

    use super::{AmountInput, parse_amount, parse_date};

    fn text(value: &str) -> AmountInput {
        AmountInput::Text(value.to_owned())
    }

    #[test]
    fn parses_positive_amounts_exactly() {
        assert_eq!(parse_amount(&text("0.1")), Ok(dec!(0.1)));
        assert_eq!(parse_amount(&text(" 20 ")), Ok(dec!(20)));
        assert_eq!(parse_amount(&text("1e2")), Ok(dec!(100)));
        assert_eq!(
            parse_amount(&AmountInput::Number(serde_json::Number::from(7))),
            Ok(dec!(7))
        );
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_amounts() {
        for value in ["0", "-5", "abc", "", "NaN", "inf", "1e400"] {
            assert!(
                matches!(parse_amount(&text(value)), Err(Error::Validation(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn parses_timestamps_and_dates() {
        assert_eq!(
            parse_date("2025-10-16T08:30:00+13:00"),
            Some(datetime!(2025-10-15 19:30 UTC))
        );
        assert_eq!(
            parse_date("2025-10-16"),
            Some(datetime!(2025-10-16 00:00 UTC))
        );
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-13-01"), None);
    }
}

#[cfg(test)]
mod new_transaction_tests {
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{NewTransaction, TransactionFields, TransactionType},
    };

    fn fields(value: Value) -> TransactionFields {
        serde_json::from_value(value).expect("could not deserialize test fields")
    }

    #[test]
    fn validates_complete_fields() {
        let now = datetime!(2025-10-16 09:00 UTC);

        let got = NewTransaction::from_fields(
            fields(json!({
                "account": 1,
                "type": "income",
                "amount": "250.00",
                "category": " Salary ",
                "note": "October",
            })),
            now,
        );

        assert_eq!(
            got,
            Ok(NewTransaction {
                account_id: 1,
                transaction_type: TransactionType::Income,
                amount: dec!(250.00),
                category: "Salary".to_owned(),
                note: Some("October".to_owned()),
                date: now,
            })
        );
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let complete = json!({
            "account": 1,
            "type": "expense",
            "amount": 5,
            "category": "Coffee",
        });

        for key in ["account", "type", "amount", "category"] {
            let mut incomplete = complete.clone();
            incomplete.as_object_mut().unwrap().remove(key);

            let got =
                NewTransaction::from_fields(fields(incomplete), datetime!(2025-01-01 0:00 UTC));

            assert!(matches!(got, Err(Error::Validation(_))), "missing {key}: {got:?}");
        }
    }

    #[test]
    fn blank_category_is_rejected() {
        let got = NewTransaction::from_fields(
            fields(json!({ "account": 1, "type": "expense", "amount": 5, "category": "  " })),
            datetime!(2025-01-01 0:00 UTC),
        );

        assert!(matches!(got, Err(Error::Validation(_))));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let got = NewTransaction::from_fields(
            fields(json!({ "account": 1, "type": "transfer", "amount": 5, "category": "Move" })),
            datetime!(2025-01-01 0:00 UTC),
        );

        assert_eq!(
            got,
            Err(Error::Validation(
                "Type must be 'income' or 'expense'".to_owned()
            ))
        );
    }

    #[test]
    fn invalid_date_is_rejected() {
        let got = NewTransaction::from_fields(
            fields(json!({
                "account": 1,
                "type": "expense",
                "amount": 5,
                "category": "Coffee",
                "date": "not a date",
            })),
            datetime!(2025-01-01 0:00 UTC),
        );

        assert!(matches!(got, Err(Error::Validation(_))));
    }
}

#[cfg(test)]
mod transaction_changes_tests {
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{Transaction, TransactionChanges, TransactionFields, TransactionType},
    };

    fn fields(value: Value) -> TransactionFields {
        serde_json::from_value(value).expect("could not deserialize test fields")
    }

    fn existing() -> Transaction {
        Transaction {
            id: 3,
            account_id: 1,
            transaction_type: TransactionType::Income,
            amount: dec!(50),
            category: "Salary".to_owned(),
            note: Some("bonus".to_owned()),
            date: datetime!(2025-10-01 0:00 UTC),
        }
    }

    #[test]
    fn empty_changes_keep_everything() {
        let changes = TransactionChanges::from_fields(fields(json!({}))).unwrap();

        assert_eq!(changes.apply_to(&existing()), existing());
    }

    #[test]
    fn applies_every_supplied_field() {
        let changes = TransactionChanges::from_fields(fields(json!({
            "account": 2,
            "type": "expense",
            "amount": 30,
            "category": "Rent",
            "note": "",
            "date": "2025-10-02",
        })))
        .unwrap();

        let got = changes.apply_to(&existing());

        assert_eq!(
            got,
            Transaction {
                id: 3,
                account_id: 2,
                transaction_type: TransactionType::Expense,
                amount: dec!(30),
                category: "Rent".to_owned(),
                note: Some("".to_owned()),
                date: datetime!(2025-10-02 0:00 UTC),
            }
        );
    }

    #[test]
    fn null_note_clears_it() {
        let changes = TransactionChanges::from_fields(fields(json!({ "note": null }))).unwrap();

        assert_eq!(changes.apply_to(&existing()).note, None);
    }

    #[test]
    fn blank_category_and_bad_date_are_ignored() {
        let changes = TransactionChanges::from_fields(fields(json!({
            "category": "   ",
            "date": "soon",
        })))
        .unwrap();

        assert_eq!(changes.apply_to(&existing()), existing());
    }

    #[test]
    fn invalid_amount_and_type_are_rejected() {
        for value in [
            json!({ "amount": 0 }),
            json!({ "amount": -5 }),
            json!({ "amount": "ten" }),
            json!({ "type": "transfer" }),
            json!({ "account": null }),
            json!({ "amount": null }),
        ] {
            let got = TransactionChanges::from_fields(fields(value.clone()));

            assert!(matches!(got, Err(Error::Validation(_))), "{value}: {got:?}");
        }
    }
}
