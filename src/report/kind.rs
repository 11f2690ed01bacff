//! The five report kinds and their column layouts.

use serde::{Deserialize, Serialize};

/// How the values in a column should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain text, e.g. a name.
    Text,
    /// A whole number of things.
    Count,
    /// An amount of money.
    Currency,
    /// A calendar date.
    Date,
    /// A quantity without a unit.
    Quantity,
    /// A quantity with its unit, e.g. "12.5 kg".
    Measure,
}

/// A column in a report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// The column heading.
    pub header: &'static str,
    /// How the column's values are presented.
    pub kind: ColumnKind,
}

const fn column(header: &'static str, kind: ColumnKind) -> Column {
    Column { header, kind }
}

const CUSTOMER_SPENDING_COLUMNS: &[Column] = &[
    column("Customer", ColumnKind::Text),
    column("Phone", ColumnKind::Text),
    column("Transaction Count", ColumnKind::Count),
    column("Total Spent", ColumnKind::Currency),
];

const PRODUCT_PURCHASES_COLUMNS: &[Column] = &[
    column("Product", ColumnKind::Text),
    column("Serial", ColumnKind::Text),
    column("Total Quantity", ColumnKind::Quantity),
    column("Total Amount", ColumnKind::Currency),
];

const RECENT_TRANSACTIONS_COLUMNS: &[Column] = &[
    column("Date", ColumnKind::Date),
    column("Customer", ColumnKind::Text),
    column("Product", ColumnKind::Text),
    column("Quantity", ColumnKind::Measure),
    column("Total Amount", ColumnKind::Currency),
];

const CUSTOMER_LIST_COLUMNS: &[Column] = &[
    column("Name", ColumnKind::Text),
    column("Phone", ColumnKind::Text),
    column("Joined Date", ColumnKind::Date),
    column("Status", ColumnKind::Text),
];

const PRODUCT_LIST_COLUMNS: &[Column] = &[
    column("Name", ColumnKind::Text),
    column("Serial", ColumnKind::Text),
    column("Description", ColumnKind::Text),
    column("Added Date", ColumnKind::Date),
];

/// One of the fixed report categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Total spent per customer, biggest spender first.
    #[default]
    CustomerSpending,
    /// Quantity and amount bought per product.
    ProductPurchases,
    /// The newest transactions.
    RecentTransactions,
    /// Every customer.
    CustomerList,
    /// Every product.
    ProductList,
}

impl ReportKind {
    /// Every report kind in the order they are offered to users.
    pub const ALL: [ReportKind; 5] = [
        ReportKind::CustomerSpending,
        ReportKind::ProductPurchases,
        ReportKind::RecentTransactions,
        ReportKind::CustomerList,
        ReportKind::ProductList,
    ];

    /// The 1-based position of the kind, used in export file names.
    pub fn number(self) -> u8 {
        match self {
            ReportKind::CustomerSpending => 1,
            ReportKind::ProductPurchases => 2,
            ReportKind::RecentTransactions => 3,
            ReportKind::CustomerList => 4,
            ReportKind::ProductList => 5,
        }
    }

    /// The heading shown above the kind's table.
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::CustomerSpending => "Customer Spending",
            ReportKind::ProductPurchases => "Product Purchases",
            ReportKind::RecentTransactions => "Recent Transactions",
            ReportKind::CustomerList => "Customer List",
            ReportKind::ProductList => "Product List",
        }
    }

    /// The name of the worksheet holding this kind's rows.
    pub fn sheet_name(self) -> &'static str {
        match self {
            ReportKind::CustomerSpending => "Customer Spending",
            ReportKind::ProductPurchases => "Product Purchases",
            ReportKind::RecentTransactions => "Transactions",
            ReportKind::CustomerList => "Customers",
            ReportKind::ProductList => "Products",
        }
    }

    /// The columns shown for this kind, in display order.
    pub fn columns(self) -> &'static [Column] {
        match self {
            ReportKind::CustomerSpending => CUSTOMER_SPENDING_COLUMNS,
            ReportKind::ProductPurchases => PRODUCT_PURCHASES_COLUMNS,
            ReportKind::RecentTransactions => RECENT_TRANSACTIONS_COLUMNS,
            ReportKind::CustomerList => CUSTOMER_LIST_COLUMNS,
            ReportKind::ProductList => PRODUCT_LIST_COLUMNS,
        }
    }

    /// Shown instead of a table when there is nothing to report.
    pub fn no_data_message(self) -> &'static str {
        match self {
            ReportKind::CustomerSpending => "No customer spending data available",
            ReportKind::ProductPurchases => "No product purchase data available",
            ReportKind::RecentTransactions => "No transaction data available",
            ReportKind::CustomerList => "No customer data available",
            ReportKind::ProductList => "No product data available",
        }
    }

    /// The value used in query strings, e.g. "recent-transactions".
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::CustomerSpending => "customer-spending",
            ReportKind::ProductPurchases => "product-purchases",
            ReportKind::RecentTransactions => "recent-transactions",
            ReportKind::CustomerList => "customer-list",
            ReportKind::ProductList => "product-list",
        }
    }
}
