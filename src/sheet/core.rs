use crate::{
    Error,
    confirmation::Confirmation,
    customer::Customer,
    database_id::TransactionId,
    stores::{TransactionQuery, TransactionStore},
    transaction::{NewTransaction, TransactionRecord},
};

use time::OffsetDateTime;

/// A customer's transactions, newest first, with totals derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSheet {
    customer: Customer,
    transactions: Vec<TransactionRecord>,
}

impl TransactionSheet {
    /// Load the sheet for `customer` from `store`.
    pub fn load(customer: Customer, store: &impl TransactionStore) -> Result<Self, Error> {
        let transactions = store.list(&TransactionQuery {
            customer_id: Some(customer.id),
            ..Default::default()
        })?;

        Ok(Self {
            customer,
            transactions,
        })
    }

    /// The customer the sheet belongs to.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// The customer's transactions, newest first.
    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The sum of the transaction totals. Missing totals count as zero.
    pub fn total_amount(&self) -> f64 {
        self.transactions
            .iter()
            .map(|transaction| transaction.total_amount.unwrap_or(0.0))
            .sum()
    }

    /// The sum of the transaction quantities. Missing quantities count as zero.
    pub fn total_item_count(&self) -> f64 {
        self.transactions
            .iter()
            .map(|transaction| transaction.quantity.unwrap_or(0.0))
            .sum()
    }

    /// Store `transaction` and add it to the top of the sheet.
    ///
    /// The sheet is left unchanged if the store rejects the transaction.
    ///
    /// # Errors
    /// Returns an [Error::InvalidReference] if the transaction is for a
    /// different customer, or any error from the store.
    pub fn append(
        &mut self,
        store: &impl TransactionStore,
        transaction: &NewTransaction,
        created_at: OffsetDateTime,
    ) -> Result<&TransactionRecord, Error> {
        if transaction.customer_id() != self.customer.id {
            return Err(Error::InvalidReference);
        }

        let record = store.insert(transaction, created_at)?;
        self.transactions.insert(0, record);

        Ok(&self.transactions[0])
    }

    /// Delete the transaction `id` if the user has confirmed it.
    ///
    /// Returns whether the transaction was removed. Pending and cancelled
    /// requests never touch the store.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if `id` is not on this
    /// sheet, or any error from the store. The sheet is unchanged on error.
    pub fn remove(
        &mut self,
        store: &impl TransactionStore,
        id: TransactionId,
        confirmation: Confirmation,
    ) -> Result<bool, Error> {
        if confirmation != Confirmation::Confirmed {
            return Ok(false);
        }

        let Some(index) = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
        else {
            return Err(Error::DeleteMissingTransaction);
        };

        store.delete(id)?;
        self.transactions.remove(index);

        Ok(true)
    }
}

/// Format an item count as a whole number when it has no fraction, e.g.
/// "12", and with two decimals otherwise, e.g. "12.50".
pub fn format_item_count(count: f64) -> String {
    let formatted = format!("{count:.2}");

    match formatted.strip_suffix(".00") {
        Some(whole) => whole.to_owned(),
        None => formatted,
    }
}
