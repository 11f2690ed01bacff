use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::ProductId, db::timestamp_to_datetime, error::ValidationError};

/// A kind of scrap the yard buys, e.g. copper wire or aluminium cans.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// The id for the product.
    pub id: ProductId,
    /// The system generated serial number. Never changes after creation.
    pub serial: SerialNumber,
    /// The product's name.
    pub name: String,
    /// An optional description.
    pub description: Option<String>,
    /// When the product was added.
    pub created_at: OffsetDateTime,
}

/// A unique product identifier of the form `TZ-<unix millis>-<9 base-36 characters>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialNumber(String);

const SERIAL_SUFFIX_LENGTH: usize = 9;

impl SerialNumber {
    /// Generate a serial number from the creation time and a random suffix.
    pub fn generate(created_at: OffsetDateTime, rng: &mut impl Rng) -> Self {
        let millis = created_at.unix_timestamp_nanos() / 1_000_000;
        let suffix: String = (0..SERIAL_SUFFIX_LENGTH)
            .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
            .collect();

        Self(format!("TZ-{millis}-{suffix}"))
    }

    /// Wrap a serial number read back from the database.
    pub fn new_unchecked(serial: &str) -> Self {
        Self(serial.to_owned())
    }

    /// The serial number as text, e.g. "TZ-1741356300123-k3j9x0q2a".
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SerialNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for SerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The form data for creating or editing a product.
///
/// There is no serial number field, the serial number is generated on creation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Product details that have passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProduct {
    name: String,
    description: Option<String>,
}

impl ValidatedProduct {
    /// Validate a product's details.
    ///
    /// # Errors
    /// Returns a [ValidationError::EmptyName] if the name is blank.
    pub fn new(name: &str, description: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let description = description.trim();

        Ok(Self {
            name: name.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
        })
    }

    /// The trimmed, non-empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description, `None` if it was left empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TryFrom<&ProductForm> for ValidatedProduct {
    type Error = ValidationError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        Self::new(&form.name, &form.description)
    }
}

pub fn create_product_table(connection: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY,
            serial_number TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            created_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_product(row: &rusqlite::Row) -> Result<Product, rusqlite::Error> {
    let id = row.get(0)?;
    let serial: String = row.get(1)?;
    let name = row.get(2)?;
    let description = row.get(3)?;
    let created_at = timestamp_to_datetime(row.get(4)?)?;

    Ok(Product {
        id,
        serial: SerialNumber(serial),
        name,
        description,
        created_at,
    })
}
