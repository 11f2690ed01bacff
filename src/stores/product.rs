//! Defines the product store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ProductId,
    product::{Product, SerialNumber, ValidatedProduct},
};

/// Handles the creation, retrieval and removal of products.
pub trait ProductStore {
    /// Add a new product to the store with the serial number `serial`.
    ///
    /// Returns [Error::DuplicateSerialNumber] if `serial` is already taken.
    fn insert(
        &self,
        serial: &SerialNumber,
        product: &ValidatedProduct,
        created_at: OffsetDateTime,
    ) -> Result<Product, Error>;

    /// Retrieve a product from the store.
    ///
    /// Returns [Error::NotFound] if there is no product with the given `id`.
    fn get(&self, id: ProductId) -> Result<Product, Error>;

    /// Retrieve every product, newest first.
    fn list(&self) -> Result<Vec<Product>, Error>;

    /// Replace the name and description of a product. The serial number is left untouched.
    ///
    /// Returns [Error::UpdateMissingProduct] if there is no product with the given `id`.
    fn update(&self, id: ProductId, changes: &ValidatedProduct) -> Result<Product, Error>;

    /// Remove a product.
    ///
    /// Returns [Error::ProductInUse] if any transaction refers to the product, or
    /// [Error::DeleteMissingProduct] if there is no product with the given `id`.
    fn delete(&self, id: ProductId) -> Result<(), Error>;
}
