//! Budget evaluation.
//!
//! Pure, stateless comparisons of aggregated spend against a
//! [Budget](crate::models::Budget), plus a small collection type that keeps
//! at most one budget per (owner, category, period).

use std::collections::HashMap;

use crate::models::{Budget, BudgetPeriod, Transaction, TransactionKind, Username};

/// The result of evaluating spend against a budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// Whether the spend is within the budget's limit.
    pub within_limit: bool,
    /// How far the spend exceeds the limit. Zero when within the limit.
    pub overage: f64,
}

/// Compare aggregated `spend` against `budget`.
///
/// Zero spend is within any budget, regardless of how small the limit is.
pub fn evaluate(spend: f64, budget: &Budget) -> BudgetStatus {
    if spend <= budget.limit() {
        BudgetStatus {
            within_limit: true,
            overage: 0.0,
        }
    } else {
        BudgetStatus {
            within_limit: false,
            overage: spend - budget.limit(),
        }
    }
}

/// Aggregate the spend that counts against `budget` and evaluate it.
///
/// Only expense transactions belonging to the budget's owner, dated within
/// the budget's period, and matching the budget's category (all categories
/// when the budget has none) count as spend.
pub fn evaluate_transactions(transactions: &[Transaction], budget: &Budget) -> BudgetStatus {
    let spend = transactions
        .iter()
        .filter(|transaction| transaction.owner() == budget.owner())
        .filter(|transaction| transaction.kind() == TransactionKind::Expense)
        .filter(|transaction| budget.period().contains(transaction.date()))
        .filter(|transaction| {
            budget
                .category()
                .is_none_or(|category| transaction.category() == category)
        })
        .map(Transaction::amount)
        .sum();

    evaluate(spend, budget)
}

type BudgetKey = (Username, Option<String>, BudgetPeriod);

/// A collection of budgets with at most one budget per
/// (owner, category, period).
///
/// Setting a budget for a slot that already has one replaces it.
#[derive(Debug, Default, Clone)]
pub struct BudgetSet {
    budgets: HashMap<BudgetKey, Budget>,
}

impl BudgetSet {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `budget`, replacing and returning any budget already set for the
    /// same owner, category and period.
    pub fn set(&mut self, budget: Budget) -> Option<Budget> {
        let key = (
            budget.owner().clone(),
            budget.category().map(str::to_owned),
            budget.period(),
        );

        self.budgets.insert(key, budget)
    }

    /// The budget for the given owner, category and period, if one is set.
    pub fn get(
        &self,
        owner: &Username,
        category: Option<&str>,
        period: BudgetPeriod,
    ) -> Option<&Budget> {
        let key = (owner.clone(), category.map(str::to_owned), period);

        self.budgets.get(&key)
    }

    /// Remove and return the budget for the given owner, category and
    /// period.
    pub fn remove(
        &mut self,
        owner: &Username,
        category: Option<&str>,
        period: BudgetPeriod,
    ) -> Option<Budget> {
        let key = (owner.clone(), category.map(str::to_owned), period);

        self.budgets.remove(&key)
    }

    /// The number of budgets in the collection.
    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    /// Whether the collection has no budgets.
    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}
