//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    db::{lenient_number, timestamp_to_datetime},
    stores::{TransactionQuery, TransactionStore},
    transaction::{CustomerRef, NewTransaction, ProductRef, TransactionRecord},
};

use super::lock_connection;

const SELECT_RECORD: &str = "SELECT t.id, t.quantity, t.unit, t.price, t.total_amount, t.created_at,
    c.id, c.name, c.phone, p.id, p.name, p.serial_number
    FROM \"transaction\" t
    LEFT JOIN customer c ON c.id = t.customer_id
    LEFT JOIN product p ON p.id = t.product_id";

/// Stores transactions in a SQLite database.
///
/// Transactions refer to customers and products, so those tables must exist
/// in the same database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
        let customer = match row.get::<_, Option<i64>>(6)? {
            Some(id) => Some(CustomerRef {
                id,
                name: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                phone: row.get(8)?,
            }),
            None => None,
        };

        let product = match row.get::<_, Option<i64>>(9)? {
            Some(id) => Some(ProductRef {
                id,
                name: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
                serial: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
            }),
            None => None,
        };

        Ok(TransactionRecord {
            id: row.get(0)?,
            customer,
            product,
            quantity: lenient_number(row.get::<_, Value>(1)?),
            unit: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            price: lenient_number(row.get::<_, Value>(3)?),
            total_amount: lenient_number(row.get::<_, Value>(4)?),
            created_at: timestamp_to_datetime(row.get(5)?)?,
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidReference] if the customer or product does not exist,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(
        &self,
        transaction: &NewTransaction,
        created_at: OffsetDateTime,
    ) -> Result<TransactionRecord, Error> {
        let connection = lock_connection(&self.connection)?;

        let id: TransactionId = connection
            .prepare(
                "INSERT INTO \"transaction\"
                (customer_id, product_id, quantity, unit, price, total_amount, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                RETURNING id",
            )?
            .query_row(
                params![
                    transaction.customer_id(),
                    transaction.product_id(),
                    transaction.quantity(),
                    transaction.unit().code(),
                    transaction.price(),
                    transaction.total_amount(),
                    created_at.unix_timestamp(),
                ],
                |row| row.get(0),
            )?;

        let record = connection
            .prepare(&format!("{SELECT_RECORD} WHERE t.id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(record)
    }

    /// Retrieve a transaction from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<TransactionRecord, Error> {
        let connection = lock_connection(&self.connection)?;

        let record = connection
            .prepare(&format!("{SELECT_RECORD} WHERE t.id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(record)
    }

    /// Query for transactions in the database, newest first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn list(&self, query: &TransactionQuery) -> Result<Vec<TransactionRecord>, Error> {
        let mut query_string_parts = vec![SELECT_RECORD.to_owned()];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(range) = &query.created_between {
            where_clause_parts.push(format!(
                "t.created_at BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Integer(range.start().unix_timestamp()));
            query_parameters.push(Value::Integer(range.end().unix_timestamp()));
        }

        if let Some(customer_id) = query.customer_id {
            where_clause_parts.push(format!("t.customer_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(customer_id));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY t.created_at DESC, t.id DESC".to_owned());

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit}"));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        lock_connection(&self.connection)?
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = lock_connection(&self.connection)?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", params![id])?;

        match rows_affected {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        customer::{Customer, ValidatedCustomer},
        db::initialize,
        product::{Product, SerialNumber, ValidatedProduct},
        stores::{
            CustomerStore, ProductStore, TransactionQuery, TransactionStore,
            sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
        },
        transaction::{NewTransaction, Unit},
    };

    struct Fixture {
        connection: Arc<Mutex<Connection>>,
        customers: SQLiteCustomerStore,
        transactions: SQLiteTransactionStore,
        customer: Customer,
        product: Product,
    }

    const START: OffsetDateTime = datetime!(2025-04-01 10:00 UTC);

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let customers = SQLiteCustomerStore::new(connection.clone());
        let products = SQLiteProductStore::new(connection.clone());
        let transactions = SQLiteTransactionStore::new(connection.clone());

        let customer = customers
            .insert(&ValidatedCustomer::new("Ada", "08012345678").unwrap(), START)
            .unwrap();
        let product = products
            .insert(
                &SerialNumber::new_unchecked("TZ-1-abcdefghi"),
                &ValidatedProduct::new("Copper", "").unwrap(),
                START,
            )
            .unwrap();

        Fixture {
            connection,
            customers,
            transactions,
            customer,
            product,
        }
    }

    fn insert_at(fixture: &Fixture, quantity: f64, created_at: OffsetDateTime) {
        let transaction = NewTransaction::new(
            fixture.customer.id,
            fixture.product.id,
            quantity,
            Unit::Kilogram,
            100.0,
        )
        .unwrap();

        fixture
            .transactions
            .insert(&transaction, created_at)
            .unwrap();
    }

    #[test]
    fn insert_returns_joined_record() {
        let fixture = get_fixture();
        let transaction =
            NewTransaction::new(fixture.customer.id, fixture.product.id, 2.5, Unit::Bag, 400.0)
                .unwrap();

        let record = fixture.transactions.insert(&transaction, START).unwrap();

        assert_eq!(record.quantity, Some(2.5));
        assert_eq!(record.price, Some(400.0));
        assert_eq!(record.total_amount, Some(1000.0));
        assert_eq!(record.unit, "bag");
        assert_eq!(record.created_at, START);
        let customer = record.customer.unwrap();
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.phone.as_deref(), Some("08012345678"));
        let product = record.product.unwrap();
        assert_eq!(product.name, "Copper");
        assert_eq!(product.serial, "TZ-1-abcdefghi");
    }

    #[test]
    fn insert_with_missing_product_is_invalid_reference() {
        let fixture = get_fixture();
        let transaction =
            NewTransaction::new(fixture.customer.id, 999, 1.0, Unit::Kilogram, 1.0).unwrap();

        let result = fixture.transactions.insert(&transaction, START);

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn list_is_newest_first() {
        let fixture = get_fixture();
        for quantity in 1..=3 {
            insert_at(&fixture, quantity as f64, START + Duration::hours(quantity));
        }

        let quantities = fixture
            .transactions
            .list(&TransactionQuery::default())
            .unwrap()
            .into_iter()
            .map(|record| record.quantity.unwrap())
            .collect::<Vec<_>>();

        assert_eq!(quantities, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn list_with_date_range_and_limit() {
        let fixture = get_fixture();
        for day in 0..5 {
            insert_at(&fixture, (day + 1) as f64, START + Duration::days(day));
        }

        let in_range = fixture
            .transactions
            .list(&TransactionQuery {
                created_between: Some(START + Duration::days(1)..=START + Duration::days(3)),
                ..Default::default()
            })
            .unwrap();
        let limited = fixture
            .transactions
            .list(&TransactionQuery {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(in_range.len(), 3);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].quantity, Some(5.0));
    }

    #[test]
    fn list_for_customer() {
        let fixture = get_fixture();
        let other = fixture
            .customers
            .insert(&ValidatedCustomer::new("Bola", "").unwrap(), START)
            .unwrap();
        insert_at(&fixture, 1.0, START);
        fixture
            .transactions
            .insert(
                &NewTransaction::new(other.id, fixture.product.id, 9.0, Unit::Gram, 1.0).unwrap(),
                START,
            )
            .unwrap();

        let got = fixture
            .transactions
            .list(&TransactionQuery {
                customer_id: Some(other.id),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].quantity, Some(9.0));
    }

    #[test]
    fn reads_bad_numbers_as_missing() {
        let fixture = get_fixture();
        fixture
            .connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO \"transaction\"
                (customer_id, product_id, quantity, unit, price, total_amount, created_at)
                VALUES (?1, ?2, 'lots', 'kg', NULL, '250', ?3)",
                (fixture.customer.id, fixture.product.id, START.unix_timestamp()),
            )
            .unwrap();

        let records = fixture
            .transactions
            .list(&TransactionQuery::default())
            .unwrap();

        assert_eq!(records[0].quantity, None);
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].total_amount, Some(250.0));
    }

    #[test]
    fn deleting_customer_removes_transactions() {
        let fixture = get_fixture();
        insert_at(&fixture, 1.0, START);

        fixture.customers.delete(fixture.customer.id).unwrap();

        let records = fixture
            .transactions
            .list(&TransactionQuery::default())
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn get_transaction() {
        let fixture = get_fixture();
        insert_at(&fixture, 4.0, START);
        let id = fixture.transactions.list(&TransactionQuery::default()).unwrap()[0].id;

        let record = fixture.transactions.get(id).unwrap();

        assert_eq!(record.quantity, Some(4.0));
        assert_eq!(fixture.transactions.get(id + 1), Err(Error::NotFound));
    }

    #[test]
    fn delete_transaction() {
        let fixture = get_fixture();
        insert_at(&fixture, 1.0, START);
        let id = fixture.transactions.list(&TransactionQuery::default()).unwrap()[0].id;

        assert_eq!(fixture.transactions.delete(id), Ok(()));
        assert_eq!(
            fixture.transactions.delete(id),
            Err(Error::DeleteMissingTransaction)
        );
    }
}
