//! SQLite implementations of the store traits.
//!
//! Every store shares one connection behind a mutex and only holds the lock
//! for the duration of a single query.

mod customer;
mod product;
mod transaction;

pub use customer::SQLiteCustomerStore;
pub use product::SQLiteProductStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

fn lock_connection(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}
