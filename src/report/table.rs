//! The report view model: a typed table built from [ReportData] for one [ReportKind].
//!
//! Cells keep their raw values. Each output format decides how to present
//! them, so numbers are only rounded for display.

use time::{OffsetDateTime, macros::format_description};

use crate::{
    html::{format_currency, format_number},
    report::{
        data::{MetricValue, ReportData},
        kind::{Column, ReportKind},
    },
};

/// Rows shown on the report screen.
pub const SCREEN_ROW_LIMIT: usize = 50;
/// Rows in the print document.
pub const PRINT_ROW_LIMIT: usize = 50;
/// Rows in the spreadsheet workbook.
pub const SPREADSHEET_ROW_LIMIT: usize = 1000;
/// Rows in the PDF document.
pub const DOCUMENT_ROW_LIMIT: usize = 100;

const NO_PHONE: &str = "No phone";
const NO_DESCRIPTION: &str = "No description";
const UNKNOWN: &str = "Unknown";
const ACTIVE: &str = "Active";

/// A single value in a report table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Stands in for a missing value on screen and in print, but is left
    /// empty in the spreadsheet.
    Placeholder(&'static str),
    Count(usize),
    Currency(f64),
    Number(f64),
    /// A quantity and its unit code, e.g. 12.5 and "kg".
    Measure {
        value: f64,
        unit: String,
    },
    Date(OffsetDateTime),
    DateTime(OffsetDateTime),
}

impl Cell {
    fn text_or(text: Option<&str>, placeholder: &'static str) -> Self {
        match text {
            Some(text) if !text.is_empty() => Cell::Text(text.to_owned()),
            _ => Cell::Placeholder(placeholder),
        }
    }

    /// Format the cell for people to read.
    pub fn display(&self, currency_symbol: &str) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Placeholder(text) => (*text).to_owned(),
            Cell::Count(count) => count.to_string(),
            Cell::Currency(amount) => format_currency(currency_symbol, *amount),
            Cell::Number(number) => format_number(*number),
            Cell::Measure { value, unit } => format!("{value} {unit}"),
            Cell::Date(date) => format_date(*date),
            Cell::DateTime(date_time) => format_date_time(*date_time),
        }
    }

    /// Whether the cell should be right aligned.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Cell::Count(_) | Cell::Currency(_) | Cell::Number(_) | Cell::Measure { .. }
        )
    }
}

impl From<MetricValue> for Cell {
    fn from(value: MetricValue) -> Self {
        match value {
            MetricValue::Count(count) => Cell::Count(count),
            MetricValue::Currency(amount) => Cell::Currency(amount),
            MetricValue::Number(number) => Cell::Number(number),
        }
    }
}

/// Format a date as e.g. "7 Mar 2025".
pub fn format_date(date: OffsetDateTime) -> String {
    date.format(format_description!(
        "[day padding:none] [month repr:short] [year]"
    ))
    .unwrap_or_default()
}

/// Format a date and time as e.g. "07/03/25 2:05 PM".
pub fn format_date_time(date_time: OffsetDateTime) -> String {
    date_time
        .format(format_description!(
            "[day]/[month]/[year repr:last_two] [hour repr:12 padding:none]:[minute] [period]"
        ))
        .unwrap_or_default()
}

/// The rows of one report kind, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub columns: &'static [Column],
    pub rows: Vec<Vec<Cell>>,
}

/// Build the table for `kind`.
///
/// `row_limit` caps the number of Recent Transactions rows, keeping the
/// newest. Other kinds are never cut short.
///
/// Returns `None` when there is nothing to report, in which case the
/// kind's no-data message should be shown instead of a table.
pub fn build_table(kind: ReportKind, data: &ReportData, row_limit: usize) -> Option<ReportTable> {
    let rows: Vec<Vec<Cell>> = match kind {
        ReportKind::CustomerSpending => data
            .aggregation
            .customer_spending
            .iter()
            .map(|spending| {
                vec![
                    Cell::Text(spending.name.clone()),
                    Cell::text_or(spending.phone.as_deref(), NO_PHONE),
                    Cell::Count(spending.transaction_count),
                    Cell::Currency(spending.total_spent),
                ]
            })
            .collect(),
        ReportKind::ProductPurchases => data
            .aggregation
            .product_purchases
            .iter()
            .map(|purchases| {
                vec![
                    Cell::Text(purchases.name.clone()),
                    Cell::Text(purchases.serial.clone()),
                    Cell::Number(purchases.total_quantity),
                    Cell::Currency(purchases.total_amount),
                ]
            })
            .collect(),
        ReportKind::RecentTransactions => data
            .transactions
            .iter()
            .take(row_limit)
            .map(|transaction| {
                vec![
                    Cell::DateTime(transaction.created_at),
                    Cell::text_or(
                        transaction
                            .customer
                            .as_ref()
                            .map(|customer| customer.name.as_str()),
                        UNKNOWN,
                    ),
                    Cell::text_or(
                        transaction
                            .product
                            .as_ref()
                            .map(|product| product.name.as_str()),
                        UNKNOWN,
                    ),
                    Cell::Measure {
                        value: transaction.quantity.unwrap_or(0.0),
                        unit: transaction.unit.clone(),
                    },
                    Cell::Currency(transaction.total_amount.unwrap_or(0.0)),
                ]
            })
            .collect(),
        ReportKind::CustomerList => data
            .customers
            .iter()
            .map(|customer| {
                vec![
                    Cell::Text(customer.name.clone()),
                    Cell::text_or(customer.phone.as_deref(), NO_PHONE),
                    Cell::Date(customer.created_at),
                    Cell::Text(ACTIVE.to_owned()),
                ]
            })
            .collect(),
        ReportKind::ProductList => data
            .products
            .iter()
            .map(|product| {
                vec![
                    Cell::Text(product.name.clone()),
                    Cell::Text(product.serial.to_string()),
                    Cell::text_or(product.description.as_deref(), NO_DESCRIPTION),
                    Cell::Date(product.created_at),
                ]
            })
            .collect(),
    };

    if rows.is_empty() {
        return None;
    }

    Some(ReportTable {
        kind,
        columns: kind.columns(),
        rows,
    })
}

#[cfg(test)]
pub(crate) mod test_data {
    use time::macros::datetime;

    use crate::{
        customer::Customer,
        product::{Product, SerialNumber},
        report::{data::ReportData, period::ReportPeriod},
        transaction::{CustomerRef, ProductRef, TransactionRecord},
    };

    /// Two customers, two products and `transaction_count` transactions.
    pub(crate) fn sample_report_data(transaction_count: usize) -> ReportData {
        let created_at = datetime!(2025-03-07 14:05 UTC);
        let customers = vec![
            Customer {
                id: 2,
                name: "Bola".to_owned(),
                phone: None,
                created_at,
            },
            Customer {
                id: 1,
                name: "Ada".to_owned(),
                phone: Some("08012345678".to_owned()),
                created_at,
            },
        ];
        let products = vec![
            Product {
                id: 2,
                serial: SerialNumber::new_unchecked("TZ-2-bbbbbbbbb"),
                name: "Brass".to_owned(),
                description: None,
                created_at,
            },
            Product {
                id: 1,
                serial: SerialNumber::new_unchecked("TZ-1-aaaaaaaaa"),
                name: "Copper".to_owned(),
                description: Some("Bright wire".to_owned()),
                created_at,
            },
        ];
        let transactions = (0..transaction_count)
            .map(|i| {
                let customer = &customers[i % 2];
                let product = &products[i % 2];

                TransactionRecord {
                    id: i as i64,
                    customer: Some(CustomerRef {
                        id: customer.id,
                        name: customer.name.clone(),
                        phone: customer.phone.clone(),
                    }),
                    product: Some(ProductRef {
                        id: product.id,
                        name: product.name.clone(),
                        serial: product.serial.to_string(),
                    }),
                    quantity: Some(1.5 + i as f64),
                    unit: "kg".to_owned(),
                    price: Some(100.0),
                    total_amount: Some(100.0 * (1.5 + i as f64)),
                    created_at,
                }
            })
            .collect();

        ReportData::new(
            customers,
            products,
            transactions,
            ReportPeriod::AllTime,
            created_at,
            time::UtcOffset::UTC,
        )
    }

    /// No customers, products or transactions.
    pub(crate) fn empty_report_data() -> ReportData {
        ReportData::new(
            vec![],
            vec![],
            vec![],
            ReportPeriod::AllTime,
            datetime!(2025-03-07 14:05 UTC),
            time::UtcOffset::UTC,
        )
    }
}
