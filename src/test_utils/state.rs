use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState,
    config::BusinessConfig,
    customer::{Customer, ValidatedCustomer},
    database_id::{CustomerId, ProductId},
    product::{Product, SerialNumber, ValidatedProduct},
    stores::{CustomerStore, ProductStore, TransactionStore},
    transaction::{NewTransaction, TransactionRecord, Unit},
};

pub(crate) fn must_create_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "Etc/UTC", BusinessConfig::default())
        .expect("Could not create app state")
}

pub(crate) fn must_add_customer(state: &AppState, name: &str, phone: &str) -> Customer {
    let customer = ValidatedCustomer::new(name, phone).expect("Invalid test customer");

    state
        .customer_store
        .insert(&customer, OffsetDateTime::now_utc())
        .expect("Could not create test customer")
}

pub(crate) fn must_add_product(state: &AppState, name: &str, description: &str) -> Product {
    let now = OffsetDateTime::now_utc();
    let serial = SerialNumber::generate(now, &mut rand::thread_rng());
    let product = ValidatedProduct::new(name, description).expect("Invalid test product");

    state
        .product_store
        .insert(&serial, &product, now)
        .expect("Could not create test product")
}

pub(crate) fn must_add_transaction(
    state: &AppState,
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: f64,
    price: f64,
) -> TransactionRecord {
    let transaction = NewTransaction::new(customer_id, product_id, quantity, Unit::Kilogram, price)
        .expect("Invalid test transaction");

    state
        .transaction_store
        .insert(&transaction, OffsetDateTime::now_utc())
        .expect("Could not create test transaction")
}
