use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::CustomerId, db::timestamp_to_datetime, error::ValidationError};

/// A person or business that sells scrap to the yard.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// The id for the customer.
    pub id: CustomerId,
    /// The customer's name.
    pub name: String,
    /// An optional phone number.
    pub phone: Option<String>,
    /// When the customer was added.
    pub created_at: OffsetDateTime,
}

/// The form data for creating or editing a customer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerForm {
    /// The customer's name.
    pub name: String,
    /// The phone number, left empty if unknown.
    #[serde(default)]
    pub phone: String,
}

/// Customer details that have passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCustomer {
    name: String,
    phone: Option<String>,
}

impl ValidatedCustomer {
    /// Validate a customer's details.
    ///
    /// Leading and trailing whitespace is removed. An empty phone number is
    /// stored as no phone number.
    ///
    /// # Errors
    /// Returns a [ValidationError::EmptyName] if the name is blank, or a
    /// [ValidationError::InvalidPhone] if the phone number is not 8 to 15
    /// digits, spaces, `+`, `-`, `(` or `)`.
    pub fn new(name: &str, phone: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let phone = phone.trim();
        let phone = if phone.is_empty() {
            None
        } else if is_valid_phone(phone) {
            Some(phone.to_owned())
        } else {
            return Err(ValidationError::InvalidPhone(phone.to_owned()));
        };

        Ok(Self {
            name: name.to_owned(),
            phone,
        })
    }

    /// The trimmed, non-empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The phone number, `None` if none was given.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

impl TryFrom<&CustomerForm> for ValidatedCustomer {
    type Error = ValidationError;

    fn try_from(form: &CustomerForm) -> Result<Self, Self::Error> {
        Self::new(&form.name, &form.phone)
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let length = phone.chars().count();

    (8..=15).contains(&length)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
}

pub fn create_customer_table(connection: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT,
            created_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_customer(row: &rusqlite::Row) -> Result<Customer, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let phone = row.get(2)?;
    let created_at = timestamp_to_datetime(row.get(3)?)?;

    Ok(Customer {
        id,
        name,
        phone,
        created_at,
    })
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_customer_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_customer_table(&connection));
    }
}

#[cfg(test)]
mod validated_customer_tests {
    use crate::error::ValidationError;

    use super::ValidatedCustomer;

    #[test]
    fn trims_name_and_phone() {
        let customer = ValidatedCustomer::new("  Ada Obi ", " 0801 234 5678 ").unwrap();

        assert_eq!(customer.name(), "Ada Obi");
        assert_eq!(customer.phone(), Some("0801 234 5678"));
    }

    #[test]
    fn empty_phone_is_none() {
        let customer = ValidatedCustomer::new("Ada", "   ").unwrap();

        assert_eq!(customer.phone(), None);
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            ValidatedCustomer::new("   ", ""),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn accepts_phone_punctuation() {
        assert!(ValidatedCustomer::new("Ada", "(0801) 234-5678").is_ok());
    }

    #[test]
    fn rejects_short_long_and_alphabetic_phones() {
        for phone in ["1234567", "1234567890123456", "0801-CALL-ME"] {
            assert_eq!(
                ValidatedCustomer::new("Ada", phone),
                Err(ValidationError::InvalidPhone(phone.to_owned())),
                "want {phone:?} to be rejected"
            );
        }
    }
}
