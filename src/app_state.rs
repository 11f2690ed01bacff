//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    config::BusinessConfig,
    db::initialize,
    stores::sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Lagos".
    pub local_timezone: String,

    /// The business details shown on reports and receipts.
    pub business: BusinessConfig,

    /// The store for customers.
    pub customer_store: SQLiteCustomerStore,

    /// The store for products.
    pub product_store: SQLiteProductStore,

    /// The store for transactions.
    pub transaction_store: SQLiteTransactionStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Africa/Lagos".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        business: BusinessConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            business,
            customer_store: SQLiteCustomerStore::new(connection.clone()),
            product_store: SQLiteProductStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection),
        })
    }
}
