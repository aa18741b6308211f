//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        CurrencyCode, DatabaseID, Transaction, TransactionBuilder, TransactionPatch, Username,
    },
    stores::{SortOrder, TransactionQuery, TransactionStore},
};

const COLUMNS: &str = "id, username, kind, amount, category, date, currency, description";

/// Stores transactions in a SQLite database.
///
/// Transaction owners reference the [User](crate::models::User) model, so
/// the user table must be set up in the database and the owner registered
/// before transactions can be created. Use
/// [initialize](crate::db::initialize) to create the schema.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UnknownOwner] if the builder's owner is not a registered
    ///   user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO expense (username, kind, amount, category, date, currency, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    builder.owner.as_str(),
                    builder.kind,
                    builder.amount,
                    &builder.category,
                    builder.date,
                    &builder.currency,
                    &builder.description,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                // The caller tried to add a transaction for an unregistered user.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::UnknownOwner(builder.owner.to_string())
                }
                error => error.into(),
            })?;

        Ok(transaction)
    }

    /// Create many transactions in a single database transaction.
    ///
    /// # Errors
    /// Returns the first error encountered; none of the records are kept
    /// when that happens.
    fn import(&mut self, builders: Vec<TransactionBuilder>) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();

        let tx = connection.unchecked_transaction()?;
        let mut imported = Vec::with_capacity(builders.len());

        {
            let mut statement = tx.prepare(&format!(
                "INSERT INTO expense (username, kind, amount, category, date, currency, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {COLUMNS}"
            ))?;

            for builder in builders {
                let transaction = statement
                    .query_row(
                        (
                            builder.owner.as_str(),
                            builder.kind,
                            builder.amount,
                            &builder.category,
                            builder.date,
                            &builder.currency,
                            &builder.description,
                        ),
                        Self::map_row,
                    )
                    .map_err(|error| match error {
                        rusqlite::Error::SqliteFailure(error, Some(_))
                            if error.extended_code == 787 =>
                        {
                            Error::UnknownOwner(builder.owner.to_string())
                        }
                        error => error.into(),
                    })?;

                imported.push(transaction);
            }
        }

        tx.commit()?;

        Ok(imported)
    }

    /// Apply a partial update to the transaction with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: DatabaseID, patch: TransactionPatch) -> Result<Transaction, Error> {
        let mut transaction = self.get(id)?;
        transaction.apply(&patch);

        let connection = self.connection.lock().unwrap();
        let rows_changed = connection.execute(
            "UPDATE expense
             SET kind = ?1, amount = ?2, category = ?3, date = ?4, currency = ?5, description = ?6
             WHERE id = ?7",
            (
                transaction.kind(),
                transaction.amount(),
                transaction.category(),
                transaction.date(),
                transaction.currency(),
                transaction.description(),
                id,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(transaction)
    }

    /// Remove the transaction with `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense WHERE id = ?1", [id])?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {COLUMNS} FROM expense WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![format!("SELECT {COLUMNS} FROM expense")];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(owner) = query.owner {
            where_clause_parts.push(format!("username = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(owner.as_str().to_owned()));
        }

        if let Some(date_range) = query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        if let Some(category) = query.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category));
        }

        if let Some(currency) = query.currency {
            where_clause_parts.push(format!("currency = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(currency.as_str().to_owned()));
        }

        if let Some(kind) = query.kind {
            where_clause_parts.push(format!("kind = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(kind.as_str().to_owned()));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        match query.sort_date {
            // `id` breaks ties so records sharing a date keep insertion order.
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY date ASC, id ASC".to_owned())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC, id ASC".to_owned())
            }
            None => query_string_parts.push("ORDER BY id ASC".to_owned()),
        }

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit} OFFSET {}", query.offset));
        } else if query.offset > 0 {
            // SQLite requires a LIMIT clause to use OFFSET.
            query_string_parts.push(format!("LIMIT -1 OFFSET {}", query.offset));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Get the total number of transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM expense", [], |row| {
                row.get::<_, i64>(0).map(|count| count as usize)
            })
            .map_err(|error| error.into())
    }
}

impl CreateTable for SqliteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    currency TEXT NOT NULL,
                    description TEXT NOT NULL,
                    FOREIGN KEY(username) REFERENCES user(username) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let username: String = row.get(offset + 1)?;
        let kind = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let category: String = row.get(offset + 4)?;
        let date = row.get(offset + 5)?;
        let currency: CurrencyCode = row.get(offset + 6)?;
        let description: String = row.get(offset + 7)?;

        // Amounts and currencies were validated before they were persisted,
        // so the builder's checks are not repeated here.
        let transaction = Transaction::new_unchecked(
            id,
            Username::new(&username),
            kind,
            amount,
            currency,
            category,
            date,
            description,
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        models::{PasswordHash, Transaction, TransactionKind, TransactionPatch, Username},
        stores::{
            SortOrder, TransactionQuery, TransactionStore, UserStore,
            sqlite::{SqliteUserStore, create_stores},
        },
    };

    use super::SqliteTransactionStore;

    fn get_stores() -> (SqliteTransactionStore, SqliteUserStore) {
        let connection = Connection::open_in_memory().unwrap();
        let (transaction_store, mut user_store) = create_stores(connection).unwrap();

        user_store
            .create(
                Username::new("alice"),
                PasswordHash::new_unchecked("notarealhash"),
            )
            .unwrap();

        (transaction_store, user_store)
    }

    fn owner() -> Username {
        Username::new("alice")
    }

    #[test]
    fn create_succeeds() {
        let (mut store, _) = get_stores();

        let transaction = store
            .create(
                Transaction::build(12.3, owner())
                    .unwrap()
                    .category("Food")
                    .date(date!(2024 - 01 - 01))
                    .description("groceries"),
            )
            .unwrap();

        assert!(transaction.id() > 0);
        assert_eq!(transaction.amount(), 12.3);
        assert_eq!(transaction.owner(), &owner());
        assert_eq!(transaction.category(), "Food");
        assert_eq!(transaction.description(), "groceries");
    }

    #[test]
    fn create_fails_on_unregistered_owner() {
        let (mut store, _) = get_stores();

        let result = store.create(Transaction::build(12.3, Username::new("mallory")).unwrap());

        assert_eq!(result, Err(Error::UnknownOwner("mallory".to_owned())));
    }

    #[test]
    fn get_transaction_by_id_succeeds() {
        let (mut store, _) = get_stores();
        let transaction = store
            .create(Transaction::build(3.14, owner()).unwrap())
            .unwrap();

        let selected = store.get(transaction.id());

        assert_eq!(selected, Ok(transaction));
    }

    #[test]
    fn get_transaction_fails_on_invalid_id() {
        let (mut store, _) = get_stores();
        let transaction = store
            .create(Transaction::build(123.0, owner()).unwrap())
            .unwrap();

        let maybe_transaction = store.get(transaction.id() + 654);

        assert_eq!(maybe_transaction, Err(Error::NotFound));
    }

    #[test]
    fn update_changes_fields_and_keeps_id() {
        let (mut store, _) = get_stores();
        let transaction = store
            .create(Transaction::build(50.0, owner()).unwrap().category("Food"))
            .unwrap();

        let updated = store
            .update(
                transaction.id(),
                TransactionPatch::new()
                    .amount(75.5)
                    .unwrap()
                    .kind(TransactionKind::Income)
                    .category("Salary"),
            )
            .unwrap();

        assert_eq!(updated.id(), transaction.id());
        assert_eq!(updated.amount(), 75.5);
        assert_eq!(updated.kind(), TransactionKind::Income);
        assert_eq!(updated.category(), "Salary");
        assert_eq!(store.get(transaction.id()).unwrap(), updated);
    }

    #[test]
    fn update_fails_on_unknown_id() {
        let (mut store, _) = get_stores();

        let result = store.update(999, TransactionPatch::new().category("Bills"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_the_record() {
        let (mut store, _) = get_stores();
        let transaction = store
            .create(Transaction::build(1.0, owner()).unwrap())
            .unwrap();

        store.delete(transaction.id()).unwrap();

        assert_eq!(store.get(transaction.id()), Err(Error::NotFound));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn delete_fails_on_unknown_id() {
        let (mut store, _) = get_stores();

        assert_eq!(store.delete(999), Err(Error::NotFound));
    }

    #[test]
    fn query_filters_by_owner_and_date_range() {
        let (mut store, mut user_store) = get_stores();
        user_store
            .create(
                Username::new("bob"),
                PasswordHash::new_unchecked("notarealhash"),
            )
            .unwrap();

        let want = store
            .create(
                Transaction::build(10.0, owner())
                    .unwrap()
                    .date(date!(2024 - 01 - 15)),
            )
            .unwrap();
        store
            .create(
                Transaction::build(20.0, Username::new("bob"))
                    .unwrap()
                    .date(date!(2024 - 01 - 16)),
            )
            .unwrap();
        store
            .create(
                Transaction::build(30.0, owner())
                    .unwrap()
                    .date(date!(2024 - 02 - 01)),
            )
            .unwrap();

        let got = store
            .query(TransactionQuery {
                owner: Some(owner()),
                date_range: Some(date!(2024 - 01 - 01)..=date!(2024 - 01 - 31)),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn query_filters_by_category_and_currency() {
        let (mut store, _) = get_stores();

        let want = store
            .create(
                Transaction::build(10.0, owner())
                    .unwrap()
                    .category("Food")
                    .currency("NZD".parse().unwrap()),
            )
            .unwrap();
        store
            .create(
                Transaction::build(20.0, owner())
                    .unwrap()
                    .category("Food")
                    .currency("USD".parse().unwrap()),
            )
            .unwrap();
        store
            .create(
                Transaction::build(30.0, owner())
                    .unwrap()
                    .category("Bills")
                    .currency("NZD".parse().unwrap()),
            )
            .unwrap();

        let got = store
            .query(TransactionQuery {
                category: Some("Food".to_owned()),
                currency: Some("NZD".parse().unwrap()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn query_sorts_by_descending_date() {
        let (mut store, _) = get_stores();

        for date in [
            date!(2024 - 01 - 01),
            date!(2024 - 03 - 01),
            date!(2024 - 02 - 01),
        ] {
            store
                .create(Transaction::build(1.0, owner()).unwrap().date(date))
                .unwrap();
        }

        let got = store
            .query(TransactionQuery {
                sort_date: Some(SortOrder::Descending),
                ..Default::default()
            })
            .unwrap();

        let dates: Vec<_> = got.iter().map(|t| t.date()).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 01),
                date!(2024 - 02 - 01),
                date!(2024 - 01 - 01)
            ]
        );
    }

    #[test]
    fn query_applies_offset_and_limit() {
        let (mut store, _) = get_stores();
        let mut all = Vec::new();

        for i in 1..=10 {
            all.push(
                store
                    .create(Transaction::build(i as f64, owner()).unwrap())
                    .unwrap(),
            );
        }

        let got = store
            .query(TransactionQuery {
                offset: 3,
                limit: Some(4),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got, all[3..7].to_vec());
    }

    #[test]
    fn import_is_all_or_nothing() {
        let (mut store, _) = get_stores();

        let builders = vec![
            Transaction::build(1.0, owner()).unwrap(),
            Transaction::build(2.0, Username::new("mallory")).unwrap(),
        ];

        let result = store.import(builders);

        assert_eq!(result, Err(Error::UnknownOwner("mallory".to_owned())));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn import_round_trips_all_fields() {
        let (mut store, _) = get_stores();

        let builders = vec![
            Transaction::build(1.5, owner())
                .unwrap()
                .category("Food")
                .date(date!(2024 - 01 - 01))
                .description("Tom's Hardware"),
            Transaction::build(2.5, owner())
                .unwrap()
                .kind(TransactionKind::Income)
                .currency("EUR".parse().unwrap()),
        ];

        let imported = store.import(builders.clone()).unwrap();

        assert_eq!(imported.len(), 2);
        for (builder, got) in builders.into_iter().zip(imported.iter()) {
            let want = builder.finalise(got.id());
            assert_eq!(&want, got);
        }
    }
}
