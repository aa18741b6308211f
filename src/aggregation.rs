//! Transaction data aggregation.
//!
//! Pure functions that compute grouped sums over a snapshot of one owner's
//! transactions, typically the result of a
//! [TransactionStore::query](crate::stores::TransactionStore::query).
//! Aggregation is additive: summing over any partition of a snapshot and
//! combining the parts gives the same totals as summing the whole.

use std::collections::HashMap;

use time::Date;

use crate::models::{CurrencyCode, Transaction};

/// Sums transaction amounts per category.
///
/// An empty snapshot gives an empty map.
pub fn sum_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        *totals
            .entry(transaction.category().to_owned())
            .or_insert(0.0) += transaction.amount();
    }

    totals
}

/// Sums transaction amounts per calendar date.
pub fn sum_by_date(transactions: &[Transaction]) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.date()).or_insert(0.0) += transaction.amount();
    }

    totals
}

/// Sums transaction amounts per month.
///
/// Each month is keyed by its first day.
pub fn sum_by_month(transactions: &[Transaction]) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        let month = transaction.date().replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += transaction.amount();
    }

    totals
}

/// Sums transaction amounts per currency.
///
/// Amounts in different currencies are never combined; conversion is a
/// collaborator concern.
pub fn sum_by_currency(transactions: &[Transaction]) -> HashMap<CurrencyCode, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        *totals.entry(transaction.currency().clone()).or_insert(0.0) += transaction.amount();
    }

    totals
}

/// Sums the amounts of transactions dated within `start..=end` (inclusive).
pub fn total_between(transactions: &[Transaction], start: Date, end: Date) -> f64 {
    transactions
        .iter()
        .filter(|transaction| start <= transaction.date() && transaction.date() <= end)
        .map(Transaction::amount)
        .sum()
}
