//! Defines the transaction store trait and its query type.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{
        CurrencyCode, DatabaseID, Transaction, TransactionBuilder, TransactionKind,
        TransactionPatch, Username,
    },
};

/// Handles the creation, retrieval and mutation of transactions.
///
/// Implementers assign monotonically increasing IDs on create and append
/// records in insertion order. All operations are synchronous and leave the
/// store unchanged when they fail.
pub trait TransactionStore {
    /// Create a new transaction in the store and return it with its
    /// assigned ID.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Create many transactions in the store, e.g. rows loaded from a CSV
    /// file, and return them in insertion order.
    fn import(&mut self, builders: Vec<TransactionBuilder>) -> Result<Vec<Transaction>, Error>;

    /// Apply a partial update to the transaction with `id` and return the
    /// updated record.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` is not in the store; the store is
    /// unchanged.
    fn update(&mut self, id: DatabaseID, patch: TransactionPatch) -> Result<Transaction, Error>;

    /// Remove the transaction with `id` from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` is not in the store.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Retrieve a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` is not in the store.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Get the total number of transactions in the store.
    fn count(&self) -> Result<usize, Error>;
}

/// Defines how transactions should be fetched from
/// [TransactionStore::query].
///
/// Filters that are `None` do not constrain the result. Unsorted results
/// preserve insertion order.
#[derive(Debug, Default, Clone)]
pub struct TransactionQuery {
    /// Include only transactions belonging to `owner`.
    pub owner: Option<Username>,
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Include only transactions with this exact category.
    pub category: Option<String>,
    /// Include only transactions denominated in this currency.
    pub currency: Option<CurrencyCode>,
    /// Include only expenses or only incomes.
    pub kind: Option<TransactionKind>,
    /// Orders transactions by date in the order `sort_date`. None returns
    /// transactions in the order they are stored.
    pub sort_date: Option<SortOrder>,
    /// Selects up to the first N (`limit`) transactions after filtering.
    pub limit: Option<u64>,
    /// Skips the first `offset` transactions after filtering.
    pub offset: u64,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
