//! Everything a report is rendered from, fetched from the stores in one go.

use time::{OffsetDateTime, UtcOffset};
use tokio::task::spawn_blocking;

use crate::{
    Error,
    customer::Customer,
    product::Product,
    report::{
        aggregation::{AggregationResult, aggregate},
        period::ReportPeriod,
    },
    stores::{CustomerStore, ProductStore, TransactionQuery, TransactionStore},
    transaction::TransactionRecord,
};

/// The headline numbers shown at the top of every report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub customer_count: usize,
    pub product_count: usize,
    pub transaction_count: usize,
    pub total_amount: f64,
    pub total_quantity: f64,
}

/// A summary metric's value, kept unformatted until display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(usize),
    Currency(f64),
    Number(f64),
}

impl Summary {
    /// The five metrics in display order.
    pub fn metrics(&self) -> [(&'static str, MetricValue); 5] {
        [
            ("Total Customers", MetricValue::Count(self.customer_count)),
            ("Total Products", MetricValue::Count(self.product_count)),
            (
                "Total Transactions",
                MetricValue::Count(self.transaction_count),
            ),
            ("Total Amount", MetricValue::Currency(self.total_amount)),
            ("Total Quantity", MetricValue::Number(self.total_quantity)),
        ]
    }
}

/// The input to every report format.
///
/// Customer and product lists are complete, transactions are limited to the
/// report period and sorted newest first. All timestamps are in the local
/// timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub aggregation: AggregationResult,
    pub summary: Summary,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub transactions: Vec<TransactionRecord>,
    pub period: ReportPeriod,
    pub generated_at: OffsetDateTime,
}

impl ReportData {
    /// Aggregate the records and convert their timestamps to `local_offset`.
    pub fn new(
        mut customers: Vec<Customer>,
        mut products: Vec<Product>,
        mut transactions: Vec<TransactionRecord>,
        period: ReportPeriod,
        generated_at: OffsetDateTime,
        local_offset: UtcOffset,
    ) -> Self {
        customers
            .iter_mut()
            .for_each(|customer| customer.created_at = customer.created_at.to_offset(local_offset));
        products
            .iter_mut()
            .for_each(|product| product.created_at = product.created_at.to_offset(local_offset));
        transactions.iter_mut().for_each(|transaction| {
            transaction.created_at = transaction.created_at.to_offset(local_offset)
        });

        let aggregation = aggregate(&transactions);
        let summary = Summary {
            customer_count: customers.len(),
            product_count: products.len(),
            transaction_count: transactions.len(),
            total_amount: aggregation.total_amount,
            total_quantity: aggregation.total_quantity,
        };

        Self {
            aggregation,
            summary,
            customers,
            products,
            transactions,
            period,
            generated_at: generated_at.to_offset(local_offset),
        }
    }
}

/// Load customers, products and the period's transactions concurrently, then aggregate them.
///
/// Each list is read on its own blocking task and the results are only used
/// once all three have finished.
///
/// # Errors
/// Returns the first store error, or [Error::BackgroundTaskFailed] if a task
/// panicked.
pub async fn fetch_report_data<C, P, T>(
    customer_store: C,
    product_store: P,
    transaction_store: T,
    period: ReportPeriod,
    now: OffsetDateTime,
    local_offset: UtcOffset,
) -> Result<ReportData, Error>
where
    C: CustomerStore + Send + 'static,
    P: ProductStore + Send + 'static,
    T: TransactionStore + Send + 'static,
{
    let query = TransactionQuery {
        created_between: period.created_between(now, local_offset),
        ..Default::default()
    };

    let (customers, products, transactions) = tokio::try_join!(
        spawn_blocking(move || customer_store.list()),
        spawn_blocking(move || product_store.list()),
        spawn_blocking(move || transaction_store.list(&query)),
    )
    .map_err(|error| {
        tracing::error!("a report data task failed: {error}");
        Error::BackgroundTaskFailed(error.to_string())
    })?;

    let customers =
        customers.inspect_err(|error| tracing::error!("could not list customers: {error}"))?;
    let products =
        products.inspect_err(|error| tracing::error!("could not list products: {error}"))?;
    let transactions = transactions
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?;

    Ok(ReportData::new(
        customers,
        products,
        transactions,
        period,
        now,
        local_offset,
    ))
}
