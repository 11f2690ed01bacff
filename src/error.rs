//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    alert::Alert, html::error_view, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// Input that was rejected before any change was made to the database.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ValidationError {
    /// A customer or product name was empty or only whitespace.
    #[error("name is required")]
    EmptyName,

    /// A customer phone number did not match the allowed format.
    #[error("\"{0}\" is not a valid phone number (8-15 digits) and should be left empty if unknown")]
    InvalidPhone(String),

    /// The quantity was missing, not a number, or not greater than zero.
    #[error("\"{0}\" is not a valid quantity, it must be a number greater than zero")]
    InvalidQuantity(String),

    /// The price was missing, not a number, or not greater than zero.
    #[error("\"{0}\" is not a valid price, it must be a number greater than zero")]
    InvalidPrice(String),

    /// The price times the quantity is too large to store.
    #[error("{quantity} at {price} per unit gives a total that is too large")]
    TotalTooLarge {
        /// The submitted quantity.
        quantity: f64,
        /// The submitted price per unit.
        price: f64,
    },

    /// The unit is not one of the supported units.
    #[error("\"{0}\" is not a supported unit")]
    InvalidUnit(String),

    /// A custom report period was missing a date or ended before it started.
    #[error("invalid report period: {0}")]
    InvalidPeriod(String),
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user submitted data that failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A newly generated product serial number clashed with an existing one.
    #[error("the serial number already exists in the database")]
    DuplicateSerialNumber,

    /// The product cannot be deleted because transactions still refer to it.
    #[error("the product is used by existing transactions")]
    ProductInUse,

    /// A transaction referred to a customer or product that does not exist.
    #[error("the customer or product for the transaction does not exist")]
    InvalidReference,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background task panicked or was cancelled before it finished.
    #[error("a background task failed: {0}")]
    BackgroundTaskFailed(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The spreadsheet export could not be written.
    #[error("could not write the spreadsheet: {0}")]
    SpreadsheetError(String),

    /// The PDF export could not be written.
    #[error("could not write the PDF document: {0}")]
    DocumentError(String),

    /// Tried to update a customer that does not exist
    #[error("tried to update a customer that is not in the database")]
    UpdateMissingCustomer,

    /// Tried to delete a customer that does not exist
    #[error("tried to delete a customer that is not in the database")]
    DeleteMissingCustomer,

    /// Tried to update a product that does not exist
    #[error("tried to update a product that is not in the database")]
    UpdateMissingProduct,

    /// Tried to delete a product that does not exist
    #[error("tried to delete a product that is not in the database")]
    DeleteMissingProduct,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to print a receipt for a customer without transactions.
    #[error("there are no transactions to print")]
    EmptyReceipt,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("product.serial_number") =>
            {
                Error::DuplicateSerialNumber
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidReference
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(
                    error_view(
                        "Invalid Request",
                        "422",
                        "Invalid input",
                        &capitalise(&error.to_string()),
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::SpreadsheetError(_) | Error::DocumentError(_) => InternalServerError {
                description: "Export Failed",
                fix: "The report could not be exported. Try again or check the server logs.",
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx requests.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details: capitalise(&error.to_string()),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidReference => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not add transaction".to_owned(),
                    details: "The selected customer or product no longer exists. \
                        Try refreshing the page."
                        .to_owned(),
                },
            ),
            Error::ProductInUse => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Could not delete product".to_owned(),
                    details: "The product has transactions recorded against it. \
                        Delete those transactions first."
                        .to_owned(),
                },
            ),
            Error::EmptyReceipt => (
                StatusCode::BAD_REQUEST,
                Alert::Warning {
                    message: "No transactions to print".to_owned(),
                    details: "Add products to the sheet before printing a receipt.".to_owned(),
                },
            ),
            Error::UpdateMissingCustomer => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update customer".to_owned(),
                    details: "The customer could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCustomer => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete customer".to_owned(),
                    details: "The customer could not be found. \
                        Try refreshing the page to see if the customer has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingProduct => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update product".to_owned(),
                    details: "The product could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingProduct => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete product".to_owned(),
                    details: "The product could not be found. \
                        Try refreshing the page to see if the product has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                        Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rusqlite::Connection;

    use crate::{
        Error,
        error::{ValidationError, capitalise},
    };

    #[test]
    fn query_returned_no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn foreign_key_failure_maps_to_invalid_reference() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                CREATE TABLE parent (id INTEGER PRIMARY KEY);
                CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id));",
            )
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO child (parent_id) VALUES (42)", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::InvalidReference);
    }

    #[test]
    fn validation_errors_render_as_unprocessable_alerts() {
        let response = Error::Validation(ValidationError::EmptyName).into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn capitalise_first_letter() {
        assert_eq!(capitalise("name is required"), "Name is required");
        assert_eq!(capitalise(""), "");
    }
}
