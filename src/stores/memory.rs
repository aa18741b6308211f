//! Implements an in-memory transaction store.
//!
//! Records live for the lifetime of the process and are lost on restart;
//! sessions that need durability should use the SQLite backend or the CSV
//! adapter.

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionPatch},
    stores::{SortOrder, TransactionQuery, TransactionStore},
};

/// Stores transactions in a plain vector, in insertion order.
///
/// The store is owned by one session at a time, so it does not check
/// transaction owners against a user registry; the SQLite backend enforces
/// that invariant with a foreign key.
#[derive(Debug)]
pub struct MemoryTransactionStore {
    transactions: Vec<Transaction>,
    next_id: DatabaseID,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
        }
    }

    fn position(&self, id: DatabaseID) -> Result<usize, Error> {
        self.transactions
            .iter()
            .position(|transaction| transaction.id() == id)
            .ok_or(Error::NotFound)
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = builder.finalise(self.next_id);
        // IDs are never reused, even after the record with the highest ID
        // is deleted.
        self.next_id += 1;
        self.transactions.push(transaction.clone());

        Ok(transaction)
    }

    fn import(&mut self, builders: Vec<TransactionBuilder>) -> Result<Vec<Transaction>, Error> {
        builders
            .into_iter()
            .map(|builder| self.create(builder))
            .collect()
    }

    fn update(&mut self, id: DatabaseID, patch: TransactionPatch) -> Result<Transaction, Error> {
        let index = self.position(id)?;

        let mut transaction = self.transactions[index].clone();
        transaction.apply(&patch);
        self.transactions[index] = transaction.clone();

        Ok(transaction)
    }

    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let index = self.position(id)?;
        self.transactions.remove(index);

        Ok(())
    }

    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let index = self.position(id)?;

        Ok(self.transactions[index].clone())
    }

    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut results: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|transaction| {
                query
                    .owner
                    .as_ref()
                    .is_none_or(|owner| transaction.owner() == owner)
            })
            .filter(|transaction| {
                query
                    .date_range
                    .as_ref()
                    .is_none_or(|range| range.contains(&transaction.date()))
            })
            .filter(|transaction| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|category| transaction.category() == category)
            })
            .filter(|transaction| {
                query
                    .currency
                    .as_ref()
                    .is_none_or(|currency| transaction.currency() == currency)
            })
            .filter(|transaction| query.kind.is_none_or(|kind| transaction.kind() == kind))
            .cloned()
            .collect();

        match query.sort_date {
            // Stable sorts, so records sharing a date keep insertion order.
            Some(SortOrder::Ascending) => results.sort_by_key(|transaction| transaction.date()),
            Some(SortOrder::Descending) => {
                results.sort_by(|a, b| b.date().cmp(&a.date()));
            }
            None => {}
        }

        let results = results
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit.unwrap_or(u64::MAX) as usize)
            .collect();

        Ok(results)
    }

    fn count(&self) -> Result<usize, Error> {
        Ok(self.transactions.len())
    }
}
