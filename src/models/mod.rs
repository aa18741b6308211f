//! This module defines the domain data types.

pub use budget::{Budget, BudgetPeriod};
pub use currency::CurrencyCode;
pub use goal::Goal;
pub use password::PasswordHash;
pub use transaction::{Transaction, TransactionBuilder, TransactionKind, TransactionPatch};
pub use user::{User, Username};

mod budget;
mod currency;
mod goal;
mod password;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
