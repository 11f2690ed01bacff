//! Implements a SQLite backed product store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ProductId,
    product::{Product, SerialNumber, ValidatedProduct, map_row_to_product},
    stores::ProductStore,
};

use super::lock_connection;

/// Stores products in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteProductStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteProductStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ProductStore for SQLiteProductStore {
    fn insert(
        &self,
        serial: &SerialNumber,
        product: &ValidatedProduct,
        created_at: OffsetDateTime,
    ) -> Result<Product, Error> {
        let product = lock_connection(&self.connection)?
            .prepare(
                "INSERT INTO product (serial_number, name, description, created_at)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING id, serial_number, name, description, created_at",
            )?
            .query_row(
                params![
                    serial.as_str(),
                    product.name(),
                    product.description(),
                    created_at.unix_timestamp()
                ],
                map_row_to_product,
            )?;

        Ok(product)
    }

    fn get(&self, id: ProductId) -> Result<Product, Error> {
        let product = lock_connection(&self.connection)?
            .prepare(
                "SELECT id, serial_number, name, description, created_at FROM product
                WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_row_to_product)?;

        Ok(product)
    }

    fn list(&self) -> Result<Vec<Product>, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "SELECT id, serial_number, name, description, created_at FROM product
                ORDER BY created_at DESC, id DESC",
            )?
            .query_map([], map_row_to_product)?
            .map(|maybe_product| maybe_product.map_err(Error::from))
            .collect()
    }

    fn update(&self, id: ProductId, changes: &ValidatedProduct) -> Result<Product, Error> {
        lock_connection(&self.connection)?
            .prepare(
                "UPDATE product SET name = ?1, description = ?2 WHERE id = ?3
                RETURNING id, serial_number, name, description, created_at",
            )?
            .query_row(
                params![changes.name(), changes.description(), id],
                map_row_to_product,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingProduct,
                error => error.into(),
            })
    }

    fn delete(&self, id: ProductId) -> Result<(), Error> {
        let rows_affected = lock_connection(&self.connection)?
            .execute("DELETE FROM product WHERE id = :id", &[(":id", &id)])
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                // Transactions still refer to the product.
                rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 787 => {
                    Error::ProductInUse
                }
                error => error.into(),
            })?;

        match rows_affected {
            0 => Err(Error::DeleteMissingProduct),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        customer::ValidatedCustomer,
        db::initialize,
        product::{SerialNumber, ValidatedProduct},
        stores::{
            CustomerStore, ProductStore, TransactionStore,
            sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
        },
        transaction::{NewTransaction, Unit},
    };

    fn get_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        Arc::new(Mutex::new(connection))
    }

    #[test]
    fn insert_then_get() {
        let store = SQLiteProductStore::new(get_connection());
        let serial = SerialNumber::new_unchecked("TZ-1-abcdefghi");
        let details = ValidatedProduct::new("Copper", "Bright wire").unwrap();

        let inserted = store
            .insert(&serial, &details, datetime!(2025-04-01 10:00 UTC))
            .unwrap();

        assert_eq!(inserted.serial, serial);
        assert_eq!(inserted.name, "Copper");
        assert_eq!(inserted.description.as_deref(), Some("Bright wire"));
        assert_eq!(store.get(inserted.id), Ok(inserted));
    }

    #[test]
    fn duplicate_serial_is_rejected() {
        let store = SQLiteProductStore::new(get_connection());
        let serial = SerialNumber::new_unchecked("TZ-1-abcdefghi");
        let created_at = datetime!(2025-04-01 10:00 UTC);
        store
            .insert(&serial, &ValidatedProduct::new("Copper", "").unwrap(), created_at)
            .unwrap();

        let result = store.insert(
            &serial,
            &ValidatedProduct::new("Brass", "").unwrap(),
            created_at,
        );

        assert_eq!(result, Err(Error::DuplicateSerialNumber));
    }

    #[test]
    fn update_keeps_serial() {
        let store = SQLiteProductStore::new(get_connection());
        let serial = SerialNumber::new_unchecked("TZ-1-abcdefghi");
        let product = store
            .insert(
                &serial,
                &ValidatedProduct::new("Copper", "").unwrap(),
                datetime!(2025-04-01 10:00 UTC),
            )
            .unwrap();

        let updated = store
            .update(product.id, &ValidatedProduct::new("Copper wire", "Stripped").unwrap())
            .unwrap();

        assert_eq!(updated.serial, serial);
        assert_eq!(updated.name, "Copper wire");
        assert_eq!(updated.description.as_deref(), Some("Stripped"));
    }

    #[test]
    fn update_missing_product() {
        let store = SQLiteProductStore::new(get_connection());

        let result = store.update(42, &ValidatedProduct::new("Copper", "").unwrap());

        assert_eq!(result, Err(Error::UpdateMissingProduct));
    }

    #[test]
    fn delete_missing_product() {
        let store = SQLiteProductStore::new(get_connection());

        assert_eq!(store.delete(42), Err(Error::DeleteMissingProduct));
    }

    #[test]
    fn cannot_delete_product_with_transactions() {
        let connection = get_connection();
        let customers = SQLiteCustomerStore::new(connection.clone());
        let products = SQLiteProductStore::new(connection.clone());
        let transactions = SQLiteTransactionStore::new(connection);
        let created_at = datetime!(2025-04-01 10:00 UTC);
        let customer = customers
            .insert(&ValidatedCustomer::new("Ada", "").unwrap(), created_at)
            .unwrap();
        let product = products
            .insert(
                &SerialNumber::new_unchecked("TZ-1-abcdefghi"),
                &ValidatedProduct::new("Copper", "").unwrap(),
                created_at,
            )
            .unwrap();
        transactions
            .insert(
                &NewTransaction::new(customer.id, product.id, 2.0, Unit::Kilogram, 500.0).unwrap(),
                created_at,
            )
            .unwrap();

        assert_eq!(products.delete(product.id), Err(Error::ProductInUse));
        assert!(products.get(product.id).is_ok());
    }
}
