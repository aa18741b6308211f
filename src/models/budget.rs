//! This file defines budgets: spending ceilings for a category and month.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{Error, models::Username};

/// The calendar month a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    year: i32,
    month: Month,
}

impl BudgetPeriod {
    /// Create a period for the given year and month.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The period containing `date`.
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year of the period.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the period.
    pub fn month(&self) -> Month {
        self.month
    }

    /// Whether `date` falls within this period.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month as u8)
    }
}

/// A spending ceiling for one owner, category and month.
///
/// A budget with no category caps the owner's total spend for the period.
/// Budgets are compared against aggregated spend with
/// [evaluate](crate::budget::evaluate); they carry no state of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    owner: Username,
    category: Option<String>,
    period: BudgetPeriod,
    limit: f64,
}

impl Budget {
    /// Create a budget.
    ///
    /// Pass `None` for `category` to cap the total spend across all
    /// categories.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `limit` is negative or non-finite.
    pub fn new(
        owner: Username,
        category: Option<&str>,
        period: BudgetPeriod,
        limit: f64,
    ) -> Result<Self, Error> {
        if limit < 0.0 || !limit.is_finite() {
            return Err(Error::InvalidAmount(limit));
        }

        Ok(Self {
            owner,
            category: category.map(str::to_owned),
            period,
            limit,
        })
    }

    /// The user the budget belongs to.
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// The category the budget caps, or `None` for the total spend.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The month the budget applies to.
    pub fn period(&self) -> BudgetPeriod {
        self.period
    }

    /// The spending ceiling.
    pub fn limit(&self) -> f64 {
        self.limit
    }
}

#[cfg(test)]
mod budget_period_tests {
    use time::{Month, macros::date};

    use super::BudgetPeriod;

    #[test]
    fn contains_dates_within_month() {
        let period = BudgetPeriod::new(2024, Month::January);

        assert!(period.contains(date!(2024 - 01 - 01)));
        assert!(period.contains(date!(2024 - 01 - 31)));
    }

    #[test]
    fn excludes_dates_outside_month() {
        let period = BudgetPeriod::new(2024, Month::January);

        assert!(!period.contains(date!(2024 - 02 - 01)));
        assert!(!period.contains(date!(2023 - 01 - 15)));
    }

    #[test]
    fn containing_picks_the_right_period() {
        let period = BudgetPeriod::containing(date!(2024 - 07 - 20));

        assert_eq!(period, BudgetPeriod::new(2024, Month::July));
    }

    #[test]
    fn display_is_year_dash_month() {
        let period = BudgetPeriod::new(2024, Month::March);

        assert_eq!(period.to_string(), "2024-03");
    }
}

#[cfg(test)]
mod budget_tests {
    use time::Month;

    use crate::{Error, models::Username};

    use super::{Budget, BudgetPeriod};

    #[test]
    fn new_fails_on_negative_limit() {
        let result = Budget::new(
            Username::new("alice"),
            Some("Food"),
            BudgetPeriod::new(2024, Month::January),
            -40.0,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-40.0)));
    }

    #[test]
    fn new_succeeds_without_category() {
        let budget = Budget::new(
            Username::new("alice"),
            None,
            BudgetPeriod::new(2024, Month::January),
            100.0,
        )
        .unwrap();

        assert_eq!(budget.category(), None);
        assert_eq!(budget.limit(), 100.0);
    }
}
