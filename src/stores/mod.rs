//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod memory;
mod transaction;
mod user;

pub mod sqlite;

pub use memory::MemoryTransactionStore;
pub use transaction::{SortOrder, TransactionQuery, TransactionStore};
pub use user::UserStore;
