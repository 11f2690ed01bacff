//! Implements a SQLite backed customer store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    customer::{Customer, ValidatedCustomer, map_row_to_customer},
    database_id::CustomerId,
    stores::CustomerStore,
};

use super::lock_connection;

/// Stores customers in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCustomerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCustomerStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CustomerStore for SQLiteCustomerStore {
    fn insert(
        &self,
        customer: &ValidatedCustomer,
        created_at: OffsetDateTime,
    ) -> Result<Customer, Error> {
        let connection = lock_connection(&self.connection)?;

        let customer = connection
            .prepare(
                "INSERT INTO customer (name, phone, created_at) VALUES (?1, ?2, ?3)
                RETURNING id, name, phone, created_at",
            )?
            .query_row(
                params![customer.name(), customer.phone(), created_at.unix_timestamp()],
                map_row_to_customer,
            )?;

        Ok(customer)
    }

    fn get(&self, id: CustomerId) -> Result<Customer, Error> {
        let customer = lock_connection(&self.connection)?
            .prepare("SELECT id, name, phone, created_at FROM customer WHERE id = :id")?
            .query_row(&[(":id", &id)], map_row_to_customer)?;

        Ok(customer)
    }

    fn list(&self) -> Result<Vec<Customer>, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "SELECT id, name, phone, created_at FROM customer
                ORDER BY created_at DESC, id DESC",
            )?
            .query_map([], map_row_to_customer)?
            .map(|maybe_customer| maybe_customer.map_err(Error::from))
            .collect()
    }

    fn update(&self, id: CustomerId, changes: &ValidatedCustomer) -> Result<Customer, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "UPDATE customer SET name = ?1, phone = ?2 WHERE id = ?3
                RETURNING id, name, phone, created_at",
            )?
            .query_row(
                params![changes.name(), changes.phone(), id],
                map_row_to_customer,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingCustomer,
                error => error.into(),
            })
    }

    fn delete(&self, id: CustomerId) -> Result<(), Error> {
        let rows_affected = lock_connection(&self.connection)?
            .execute("DELETE FROM customer WHERE id = :id", &[(":id", &id)])?;

        match rows_affected {
            0 => Err(Error::DeleteMissingCustomer),
            _ => Ok(()),
        }
    }
}
