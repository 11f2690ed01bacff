//! A customer's transaction sheet: the running list of what they sold, its totals and its receipt.

mod core;
mod page;
mod receipt;

pub use core::{TransactionSheet, format_item_count};
pub use page::{SheetState, append_transaction_endpoint, delete_transaction_endpoint, get_sheet_page};
pub use receipt::get_receipt_page;
