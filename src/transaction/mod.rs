//! Transactions record a customer selling a quantity of a product to the yard.
//!
//! This module holds the transaction model, its validation and the
//! transaction table. Transactions are added and removed through a
//! customer's sheet.

mod core;

pub use core::{
    CustomerRef, NewTransaction, ProductRef, TransactionForm, TransactionRecord, Unit,
    create_transaction_table,
};
