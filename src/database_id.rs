//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a customer row.
pub type CustomerId = DatabaseId;
/// The ID of a product row.
pub type ProductId = DatabaseId;
/// The ID of a transaction row.
pub type TransactionId = DatabaseId;
