//! Turns a flat list of transactions into totals and per-customer and per-product breakdowns.

use std::collections::HashMap;

use crate::{
    database_id::{CustomerId, ProductId},
    transaction::TransactionRecord,
};

/// How much a customer has sold to the yard.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSpending {
    /// The customer the group is for.
    pub customer_id: CustomerId,
    /// The name from the customer's first transaction.
    pub name: String,
    /// The phone number from the customer's first transaction.
    pub phone: Option<String>,
    /// The sum of the customer's transaction totals.
    pub total_spent: f64,
    /// The number of transactions, including those without a usable total.
    pub transaction_count: usize,
}

/// How much of a product the yard has bought.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPurchases {
    /// The product the group is for.
    pub product_id: ProductId,
    /// The name from the product's first transaction.
    pub name: String,
    /// The serial number from the product's first transaction.
    pub serial: String,
    /// The sum of the quantities sold, regardless of unit.
    pub total_quantity: f64,
    /// The sum of the transaction totals.
    pub total_amount: f64,
}

/// Totals and grouped breakdowns derived from a list of transactions.
///
/// The result is always recomputed from the transactions and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// The sum of every transaction total.
    pub total_amount: f64,
    /// The sum of every quantity.
    pub total_quantity: f64,
    /// Sorted by total spent, largest first.
    pub customer_spending: Vec<CustomerSpending>,
    /// Sorted by total amount, largest first.
    pub product_purchases: Vec<ProductPurchases>,
}

/// Aggregate `transactions` into totals and per-customer and per-product groups.
///
/// A missing quantity or total amount counts as zero. Transactions without a
/// customer are left out of the customer groups and transactions without a
/// product are left out of the product groups, but both still count towards
/// the overall totals. Groups with equal totals keep the order in which they
/// were first seen.
pub fn aggregate(transactions: &[TransactionRecord]) -> AggregationResult {
    let mut result = AggregationResult::default();
    let mut customer_index: HashMap<CustomerId, usize> = HashMap::new();
    let mut product_index: HashMap<ProductId, usize> = HashMap::new();

    for transaction in transactions {
        let amount = transaction.total_amount.unwrap_or(0.0);
        let quantity = transaction.quantity.unwrap_or(0.0);

        result.total_amount += amount;
        result.total_quantity += quantity;

        if let Some(customer) = &transaction.customer {
            let index = *customer_index.entry(customer.id).or_insert_with(|| {
                result.customer_spending.push(CustomerSpending {
                    customer_id: customer.id,
                    name: customer.name.clone(),
                    phone: customer.phone.clone(),
                    total_spent: 0.0,
                    transaction_count: 0,
                });
                result.customer_spending.len() - 1
            });

            let spending = &mut result.customer_spending[index];
            spending.total_spent += amount;
            spending.transaction_count += 1;
        }

        if let Some(product) = &transaction.product {
            let index = *product_index.entry(product.id).or_insert_with(|| {
                result.product_purchases.push(ProductPurchases {
                    product_id: product.id,
                    name: product.name.clone(),
                    serial: product.serial.clone(),
                    total_quantity: 0.0,
                    total_amount: 0.0,
                });
                result.product_purchases.len() - 1
            });

            let purchases = &mut result.product_purchases[index];
            purchases.total_quantity += quantity;
            purchases.total_amount += amount;
        }
    }

    // `sort_by` is stable, so ties keep their encounter order.
    result
        .customer_spending
        .sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    result
        .product_purchases
        .sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));

    result
}
