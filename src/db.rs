//! Database setup and helpers shared by the SQLite stores.

use rusqlite::{Connection, Transaction as SqlTransaction, types::Value};
use time::OffsetDateTime;

use crate::{
    Error, customer::create_customer_table, product::create_product_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models and turn on foreign key enforcement.
///
/// Foreign keys are enforced per connection, so this must be called on every
/// connection before it is used.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_customer_table(&transaction)?;
    create_product_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a numeric column that may hold NULL or junk.
///
/// Integers and finite reals are returned as is, text is parsed as a number,
/// and everything else (NULL, blobs, unparsable text, NaN, infinity) is
/// treated as missing.
pub fn lenient_number(value: Value) -> Option<f64> {
    let number = match value {
        Value::Integer(number) => number as f64,
        Value::Real(number) => number,
        Value::Text(text) => text.trim().parse::<f64>().ok()?,
        Value::Null | Value::Blob(_) => return None,
    };

    number.is_finite().then_some(number)
}

/// Convert a unix timestamp column back into a date-time.
pub fn timestamp_to_datetime(timestamp: i64) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })
}
