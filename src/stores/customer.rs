//! Defines the customer store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    customer::{Customer, ValidatedCustomer},
    database_id::CustomerId,
};

/// Handles the creation, retrieval and removal of customers.
pub trait CustomerStore {
    /// Add a new customer to the store.
    fn insert(
        &self,
        customer: &ValidatedCustomer,
        created_at: OffsetDateTime,
    ) -> Result<Customer, Error>;

    /// Retrieve a customer from the store.
    ///
    /// Returns [Error::NotFound] if there is no customer with the given `id`.
    fn get(&self, id: CustomerId) -> Result<Customer, Error>;

    /// Retrieve every customer, newest first.
    fn list(&self) -> Result<Vec<Customer>, Error>;

    /// Replace the name and phone number of a customer.
    ///
    /// Returns [Error::UpdateMissingCustomer] if there is no customer with the given `id`.
    fn update(&self, id: CustomerId, changes: &ValidatedCustomer) -> Result<Customer, Error>;

    /// Remove a customer and all of their transactions.
    ///
    /// Returns [Error::DeleteMissingCustomer] if there is no customer with the given `id`.
    fn delete(&self, id: CustomerId) -> Result<(), Error>;
}
