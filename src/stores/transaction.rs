//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CustomerId, TransactionId},
    transaction::{NewTransaction, TransactionRecord},
};

/// Handles the creation, retrieval and removal of transactions.
pub trait TransactionStore {
    /// Add a transaction to the store and return it with its customer and product details.
    ///
    /// Returns [Error::InvalidReference] if the customer or product does not exist.
    fn insert(
        &self,
        transaction: &NewTransaction,
        created_at: OffsetDateTime,
    ) -> Result<TransactionRecord, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns [Error::NotFound] if there is no transaction with the given `id`.
    fn get(&self, id: TransactionId) -> Result<TransactionRecord, Error>;

    /// Retrieve transactions in the way defined by `query`, newest first.
    fn list(&self, query: &TransactionQuery) -> Result<Vec<TransactionRecord>, Error>;

    /// Remove a transaction.
    ///
    /// Returns [Error::DeleteMissingTransaction] if there is no transaction with the given `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::list].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions created within this range (inclusive).
    pub created_between: Option<RangeInclusive<OffsetDateTime>>,
    /// Include only the transactions of this customer.
    pub customer_id: Option<CustomerId>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
}
