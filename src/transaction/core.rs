use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    database_id::{CustomerId, ProductId, TransactionId},
    error::ValidationError,
};

/// The unit a transaction's quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Stored as "kg".
    #[default]
    Kilogram,
    /// Stored as "g".
    Gram,
    /// A single item, e.g. one car battery.
    Piece,
    /// Stored as "liter".
    Liter,
    /// Stored as "packet".
    Packet,
    /// Stored as "bag".
    Bag,
}

impl Unit {
    /// Every unit in the order they are offered on forms.
    pub const ALL: [Unit; 6] = [
        Unit::Kilogram,
        Unit::Gram,
        Unit::Piece,
        Unit::Liter,
        Unit::Packet,
        Unit::Bag,
    ];

    /// The short code stored in the database, e.g. "kg".
    pub fn code(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Piece => "piece",
            Unit::Liter => "liter",
            Unit::Packet => "packet",
            Unit::Bag => "bag",
        }
    }

    /// The name shown to users, e.g. "Kilogram".
    pub fn label(self) -> &'static str {
        match self {
            Unit::Kilogram => "Kilogram",
            Unit::Gram => "Gram",
            Unit::Piece => "Piece",
            Unit::Liter => "Liter",
            Unit::Packet => "Packet",
            Unit::Bag => "Bag",
        }
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.code() == code.trim())
            .ok_or_else(|| ValidationError::InvalidUnit(code.to_owned()))
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The form data for adding a transaction to a customer's sheet.
///
/// Numbers are kept as text so that bad input produces a validation message
/// instead of a rejected request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransactionForm {
    /// The product being sold.
    pub product_id: ProductId,
    /// The quantity as typed, e.g. "12.5".
    pub quantity: String,
    /// The price per unit as typed.
    pub price: String,
    /// The unit code, e.g. "kg".
    pub unit: String,
}

/// A validated transaction that is ready to be stored.
///
/// The total amount is fixed when the transaction is created and is never
/// recalculated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: f64,
    unit: Unit,
    price: f64,
    total_amount: f64,
}

impl NewTransaction {
    /// Create a transaction, computing its total amount as `price * quantity`.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the quantity or price is not a finite
    /// number greater than zero, or if their product is not finite.
    pub fn new(
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: f64,
        unit: Unit,
        price: f64,
    ) -> Result<Self, ValidationError> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(ValidationError::InvalidQuantity(quantity.to_string()));
        }

        if !(price.is_finite() && price > 0.0) {
            return Err(ValidationError::InvalidPrice(price.to_string()));
        }

        let total_amount = price * quantity;

        if !total_amount.is_finite() {
            return Err(ValidationError::TotalTooLarge { quantity, price });
        }

        Ok(Self {
            customer_id,
            product_id,
            quantity,
            unit,
            price,
            total_amount,
        })
    }

    /// Parse and validate the add transaction form for `customer_id`.
    pub fn parse(customer_id: CustomerId, form: &TransactionForm) -> Result<Self, ValidationError> {
        let quantity = form
            .quantity
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidQuantity(form.quantity.clone()))?;
        let price = form
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPrice(form.price.clone()))?;
        let unit = form.unit.parse()?;

        Self::new(customer_id, form.product_id, quantity, unit, price)
    }

    /// The customer selling to the yard.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// The product being sold.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// How much was sold, in [NewTransaction::unit]s.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// The unit the quantity is measured in.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The price per unit.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// `price * quantity`, fixed when the transaction was created.
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

/// The customer details joined onto a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRef {
    /// The customer's id.
    pub id: CustomerId,
    /// The customer's name.
    pub name: String,
    /// The customer's phone number, if known.
    pub phone: Option<String>,
}

/// The product details joined onto a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    /// The product's id.
    pub id: ProductId,
    /// The product's name.
    pub name: String,
    /// The product's serial number.
    pub serial: String,
}

/// A stored transaction with its customer and product details.
///
/// Numeric columns are read leniently: a value that is missing or not a
/// usable number is `None` and counts as zero in totals.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// The id for the transaction.
    pub id: TransactionId,
    /// The customer, `None` if the customer row is missing.
    pub customer: Option<CustomerRef>,
    /// The product, `None` if the product row is missing.
    pub product: Option<ProductRef>,
    /// How much was sold.
    pub quantity: Option<f64>,
    /// The unit code as stored, e.g. "kg".
    pub unit: String,
    /// The price per unit.
    pub price: Option<f64>,
    /// The stored `price * quantity`.
    pub total_amount: Option<f64>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl TransactionRecord {
    /// The display name of the unit, or the raw code if it is not a known unit.
    pub fn unit_label(&self) -> &str {
        self.unit
            .parse::<Unit>()
            .map(Unit::label)
            .unwrap_or(self.unit.as_str())
    }
}

/// Create the transaction table and its indexes if they do not exist.
pub fn create_transaction_table(connection: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    // Deleting a customer removes their transactions, but a product with
    // transactions cannot be deleted.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL REFERENCES customer(id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES product(id) ON DELETE RESTRICT,
            quantity REAL,
            unit TEXT NOT NULL,
            price REAL,
            total_amount REAL,
            created_at INTEGER NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_customer_id ON \"transaction\"(customer_id)",
        (),
    )?;

    Ok(())
}
