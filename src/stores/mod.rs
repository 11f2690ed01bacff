//! Traits for the objects that store customers, products and transactions.
//!
//! Route handlers and the report engine only talk to storage through these
//! traits. The [sqlite] module provides the implementations used by the app.

mod customer;
mod product;
mod transaction;

pub mod sqlite;

pub use customer::CustomerStore;
pub use product::ProductStore;
pub use transaction::{TransactionQuery, TransactionStore};
