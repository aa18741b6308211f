//! This file defines savings goals and their progress tracking.

use serde::{Deserialize, Serialize};

use crate::{Error, models::Username};

/// A savings target with tracked progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    owner: Username,
    name: String,
    target_amount: f64,
    current_amount: f64,
}

impl Goal {
    /// Create a goal with nothing saved towards it yet.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `target_amount` is negative or
    /// non-finite.
    pub fn new(owner: Username, name: &str, target_amount: f64) -> Result<Self, Error> {
        if target_amount < 0.0 || !target_amount.is_finite() {
            return Err(Error::InvalidAmount(target_amount));
        }

        Ok(Self {
            owner,
            name: name.to_owned(),
            target_amount,
            current_amount: 0.0,
        })
    }

    /// The user the goal belongs to.
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// The display name of the goal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount the user wants to save.
    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    /// The amount saved so far.
    pub fn current_amount(&self) -> f64 {
        self.current_amount
    }

    /// Record `amount` saved towards the goal.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is negative or non-finite.
    /// The goal is unchanged on error.
    pub fn add(&mut self, amount: f64) -> Result<(), Error> {
        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount(amount));
        }

        self.current_amount += amount;
        Ok(())
    }

    /// Progress towards the goal as a fraction, clamped to `[0, 1]` for
    /// display.
    ///
    /// A goal with a zero target reports 1.0 once anything has been saved
    /// and 0.0 otherwise.
    pub fn progress(&self) -> f64 {
        if self.target_amount == 0.0 {
            return if self.current_amount > 0.0 { 1.0 } else { 0.0 };
        }

        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }

    /// Whether the saved amount has reached the target.
    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}
