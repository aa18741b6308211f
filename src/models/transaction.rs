//! This file defines the type `Transaction`, the core type of the ledger,
//! along with its builder and the patch type used for partial updates.

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{CurrencyCode, DatabaseID, Username},
};

/// Whether a transaction records money spent or money earned.
///
/// There is exactly one behavior for both kinds, so this is a tag field
/// rather than a dispatch hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money spent.
    #[default]
    Expense,
    /// Money earned.
    Income,
}

impl TransactionKind {
    /// The kind as the string stored in the database and shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(Error::InvalidCsv(format!(
                "\"{other}\" is not a transaction kind"
            ))),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(error.to_string().into()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the
/// builder to a [TransactionStore](crate::stores::TransactionStore), which
/// assigns the ID. Records are immutable once stored except through the
/// store's explicit update and delete operations; the ID is stable across
/// edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    owner: Username,
    kind: TransactionKind,
    amount: f64,
    currency: CurrencyCode,
    category: String,
    date: Date,
    description: String,
}

impl Transaction {
    /// Create a new transaction builder.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is negative or non-finite.
    pub fn build(amount: f64, owner: Username) -> Result<TransactionBuilder, Error> {
        TransactionBuilder::new(amount, owner)
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The user this transaction belongs to.
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// Whether this transaction is an expense or an income.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The amount of money spent or earned in this transaction.
    ///
    /// Always non-negative; [Transaction::kind] records the direction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The currency the amount is denominated in.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// A user-defined category that describes the type of the transaction.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Create a transaction from raw parts without validation.
    ///
    /// Intended for store implementations restoring records whose fields
    /// were validated before they were persisted.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        id: DatabaseID,
        owner: Username,
        kind: TransactionKind,
        amount: f64,
        currency: CurrencyCode,
        category: String,
        date: Date,
        description: String,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            amount,
            currency,
            category,
            date,
            description,
        }
    }

    pub(crate) fn apply(&mut self, patch: &TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = &patch.currency {
            self.currency = currency.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

/// Builder for creating a new [Transaction].
///
/// Finalize the builder by passing it to
/// [TransactionStore::create](crate::stores::TransactionStore::create),
/// which assigns the ID.
///
/// The amount is validated on construction and the currency is validated
/// when the [CurrencyCode] is parsed, so a builder always holds a valid
/// record. Defaults: kind expense, currency USD, category "Others", date
/// today, empty description.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) owner: Username,
    pub(crate) kind: TransactionKind,
    pub(crate) amount: f64,
    pub(crate) currency: CurrencyCode,
    pub(crate) category: String,
    pub(crate) date: Date,
    pub(crate) description: String,
}

impl TransactionBuilder {
    /// The category given to transactions that do not specify one.
    pub const DEFAULT_CATEGORY: &'static str = "Others";

    /// Create a new transaction builder.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is negative or non-finite.
    pub fn new(amount: f64, owner: Username) -> Result<Self, Error> {
        validate_amount(amount)?;

        Ok(Self {
            owner,
            kind: TransactionKind::default(),
            amount,
            currency: CurrencyCode::default(),
            category: Self::DEFAULT_CATEGORY.to_owned(),
            date: OffsetDateTime::now_utc().date(),
            description: String::new(),
        })
    }

    /// Set whether the transaction is an expense or an income.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the currency for the transaction.
    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Convert the builder into a [Transaction] with the given `id`.
    ///
    /// Intended for store implementations that have assigned `id` to the
    /// record.
    pub fn finalise(self, id: DatabaseID) -> Transaction {
        Transaction {
            id,
            owner: self.owner,
            kind: self.kind,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            date: self.date,
            description: self.description,
        }
    }
}

/// A partial update to an existing [Transaction].
///
/// Fields that are `None` are left unchanged by
/// [TransactionStore::update](crate::stores::TransactionStore::update).
/// The owner and ID of a transaction cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub(crate) kind: Option<TransactionKind>,
    pub(crate) amount: Option<f64>,
    pub(crate) currency: Option<CurrencyCode>,
    pub(crate) category: Option<String>,
    pub(crate) date: Option<Date>,
    pub(crate) description: Option<String>,
}

impl TransactionPatch {
    /// Create an empty patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set the kind to update the transaction with.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the amount to update the transaction with.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is negative or non-finite.
    pub fn amount(mut self, amount: f64) -> Result<Self, Error> {
        validate_amount(amount)?;

        self.amount = Some(amount);
        Ok(self)
    }

    /// Set the currency to update the transaction with.
    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Set the category to update the transaction with.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Set the date to update the transaction with.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description to update the transaction with.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    // `< 0.0` rather than `is_sign_negative` so that -0.0 is accepted.
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(())
}


#[cfg(test)]
mod transaction_patch_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::{TransactionKind, Username},
    };

    use super::{Transaction, TransactionPatch};

    fn sample_transaction() -> Transaction {
        Transaction::build(25.0, Username::new("alice"))
            .unwrap()
            .category("Food")
            .date(date!(2024 - 01 - 15))
            .description("lunch")
            .finalise(7)
    }

    #[test]
    fn amount_fails_on_negative() {
        let result = TransactionPatch::new().amount(-5.0);

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut transaction = sample_transaction();
        let original = transaction.clone();

        transaction.apply(&TransactionPatch::new());

        assert_eq!(transaction, original);
    }

    #[test]
    fn apply_updates_only_set_fields() {
        let mut transaction = sample_transaction();

        let patch = TransactionPatch::new()
            .amount(30.0)
            .unwrap()
            .kind(TransactionKind::Income);
        transaction.apply(&patch);

        assert_eq!(transaction.amount(), 30.0);
        assert_eq!(transaction.kind(), TransactionKind::Income);
        // Untouched fields keep their values and the ID is stable.
        assert_eq!(transaction.id(), 7);
        assert_eq!(transaction.category(), "Food");
        assert_eq!(transaction.date(), date!(2024 - 01 - 15));
        assert_eq!(transaction.description(), "lunch");
    }

    #[test]
    fn is_empty_reports_unset_patch() {
        assert!(TransactionPatch::new().is_empty());
        assert!(!TransactionPatch::new().category("Bills").is_empty());
    }
}
